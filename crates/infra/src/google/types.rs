//! Wire types for the Google Calendar v3 events API.
//!
//! Read shapes map into `RemoteEvent`; write shapes are built from the
//! domain create params. All field renames follow the REST API's
//! camelCase names.

use chrono::{DateTime, Duration, NaiveDate};
use mailcal_domain::{
    AllDayEventParams, EventStamp, MailcalError, ReminderSpec, RemoteEvent, Result,
    TimedEventParams,
};
use serde::{Deserialize, Serialize};

/// Start or end marker of an event. Timed events carry `dateTime` (with
/// a timezone label on writes), all-day events carry `date` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Event resource as returned by list/get/insert.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GoogleEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventListResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

/// Body of an insert request.
#[derive(Debug, Serialize)]
pub(crate) struct EventWriteBody {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<RemindersBody>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RemindersBody {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

impl From<ReminderSpec> for RemindersBody {
    fn from(spec: ReminderSpec) -> Self {
        Self {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: "popup".to_string(),
                minutes: spec.minutes_before_start,
            }],
        }
    }
}

impl EventWriteBody {
    /// Body for a timed event: local wall-clock datetimes plus the
    /// configured timezone label.
    pub(crate) fn timed(params: &TimedEventParams, timezone: &str) -> Self {
        Self {
            summary: params.title.clone(),
            description: params.description.clone(),
            location: params.location.clone(),
            start: EventDateTime {
                date_time: Some(params.start.format("%Y-%m-%dT%H:%M:%S").to_string()),
                date: None,
                time_zone: Some(timezone.to_string()),
            },
            end: EventDateTime {
                date_time: Some(params.end.format("%Y-%m-%dT%H:%M:%S").to_string()),
                date: None,
                time_zone: Some(timezone.to_string()),
            },
            reminders: params.reminder.map(RemindersBody::from),
        }
    }

    /// Body for an all-day event. The API's end date is exclusive, so a
    /// one-day event spans `date` to `date + 1`.
    pub(crate) fn all_day(params: &AllDayEventParams) -> Self {
        let end = params.date + Duration::days(1);
        Self {
            summary: params.title.clone(),
            description: params.description.clone(),
            location: params.location.clone(),
            start: EventDateTime {
                date_time: None,
                date: Some(params.date.to_string()),
                time_zone: None,
            },
            end: EventDateTime { date_time: None, date: Some(end.to_string()), time_zone: None },
            reminders: params.reminder.map(RemindersBody::from),
        }
    }
}

impl GoogleEvent {
    /// Map the wire event into the domain shape. Events without an id or
    /// with unparsable times are remote-data faults.
    pub(crate) fn into_remote(self) -> Result<RemoteEvent> {
        let id = self
            .id
            .ok_or_else(|| MailcalError::Remote("calendar returned an event without an id".into()))?;
        let start = stamp_from_wire(self.start, &id)?;
        let end = stamp_from_wire(self.end, &id)?;

        Ok(RemoteEvent {
            id,
            title: self.summary.unwrap_or_default(),
            start,
            end,
            description: self.description,
            location: self.location,
            html_link: self.html_link,
        })
    }
}

fn stamp_from_wire(field: Option<EventDateTime>, id: &str) -> Result<EventStamp> {
    let field = field
        .ok_or_else(|| MailcalError::Remote(format!("event {id} is missing a start or end")))?;

    if let Some(date_time) = field.date_time.as_deref() {
        let parsed = DateTime::parse_from_rfc3339(date_time).map_err(|e| {
            MailcalError::Remote(format!("event {id} has an unparsable dateTime: {e}"))
        })?;
        return Ok(EventStamp::Instant(parsed));
    }

    if let Some(date) = field.date.as_deref() {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            MailcalError::Remote(format!("event {id} has an unparsable date: {e}"))
        })?;
        return Ok(EventStamp::Day(parsed));
    }

    Err(MailcalError::Remote(format!("event {id} has neither dateTime nor date")))
}
