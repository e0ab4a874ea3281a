use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use mailcal_core::ports::EventStore;
use mailcal_domain::{
    AllDayEventParams, EventStamp, RemoteEvent, Result as DomainResult, TimedEventParams,
};

/// In-memory mock for `EventStore`.
///
/// Day queries filter the stored events by calendar date, and create
/// calls append to the same list, so a later query within one test sees
/// earlier writes exactly like the remote store would. Both create
/// variants also record their parameters for assertions.
#[derive(Default)]
pub struct MockEventStore {
    events: Mutex<Vec<RemoteEvent>>,
    timed_creates: Mutex<Vec<TimedEventParams>>,
    all_day_creates: Mutex<Vec<AllDayEventParams>>,
}

impl MockEventStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed the mock with an existing remote event.
    pub fn with_event(self: Arc<Self>, event: RemoteEvent) -> Arc<Self> {
        self.events.lock().unwrap().push(event);
        self
    }

    pub fn timed_creates(&self) -> Vec<TimedEventParams> {
        self.timed_creates.lock().unwrap().clone()
    }

    pub fn all_day_creates(&self) -> Vec<AllDayEventParams> {
        self.all_day_creates.lock().unwrap().clone()
    }

    fn next_id(&self) -> String {
        format!("evt-{}", self.events.lock().unwrap().len() + 1)
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn events_on_day(&self, date: NaiveDate) -> DomainResult<Vec<RemoteEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.start.date() == date)
            .cloned()
            .collect())
    }

    async fn upcoming_events(
        &self,
        after: DateTime<Utc>,
        limit: usize,
    ) -> DomainResult<Vec<RemoteEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.start.date() >= after.date_naive())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create_timed_event(&self, params: TimedEventParams) -> DomainResult<RemoteEvent> {
        let start = Utc.from_utc_datetime(&params.start).fixed_offset();
        let end = Utc.from_utc_datetime(&params.end).fixed_offset();
        let event = RemoteEvent {
            id: self.next_id(),
            title: params.title.clone(),
            start: EventStamp::Instant(start),
            end: EventStamp::Instant(end),
            description: params.description.clone(),
            location: params.location.clone(),
            html_link: None,
        };
        self.timed_creates.lock().unwrap().push(params);
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn create_all_day_event(&self, params: AllDayEventParams) -> DomainResult<RemoteEvent> {
        let event = RemoteEvent {
            id: self.next_id(),
            title: params.title.clone(),
            start: EventStamp::Day(params.date),
            end: EventStamp::Day(params.date + Duration::days(1)),
            description: params.description.clone(),
            location: params.location.clone(),
            html_link: None,
        };
        self.all_day_creates.lock().unwrap().push(params);
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: &str) -> DomainResult<RemoteEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|event| event.id == event_id)
            .cloned()
            .ok_or_else(|| mailcal_domain::MailcalError::Remote(format!("not found: {event_id}")))
    }

    async fn delete_event(&self, event_id: &str) -> DomainResult<()> {
        self.events.lock().unwrap().retain(|event| event.id != event_id);
        Ok(())
    }
}
