//! Google Calendar v3 REST client implementing the `EventStore` port.
//!
//! The target calendar and timezone are bound once at construction from
//! the application config; callers never pass them per request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use mailcal_core::EventStore;
use mailcal_domain::{
    AllDayEventParams, AppConfig, MailcalError, RemoteEvent, Result, TimedEventParams,
};
use tracing::debug;

use super::auth::GoogleAuth;
use super::types::{EventListResponse, EventWriteBody, GoogleEvent};
use crate::errors::InfraError;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar store backed by the Google Calendar v3 API.
pub struct GoogleCalendarStore {
    http: reqwest::Client,
    auth: GoogleAuth,
    calendar_id: String,
    timezone: String,
    api_base: String,
}

impl GoogleCalendarStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth: GoogleAuth::new(config.token_path.clone(), config.credentials_path.clone()),
            calendar_id: config.calendar_id.clone(),
            timezone: config.timezone.clone(),
            api_base: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Point the client at a custom API base URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, urlencoding::encode(&self.calendar_id))
    }

    async fn list_events(&self, query: &[(&str, &str)]) -> Result<Vec<RemoteEvent>> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(self.events_url())
            .query(query)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(InfraError::from)?;
        let response = check_status("failed to list events", response).await?;

        let payload: EventListResponse = response.json().await.map_err(InfraError::from)?;
        debug!(count = payload.items.len(), "Fetched events from Google Calendar");

        payload.items.into_iter().map(GoogleEvent::into_remote).collect()
    }

    async fn insert_event(&self, context: &'static str, body: &EventWriteBody) -> Result<RemoteEvent> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(InfraError::from)?;
        let response = check_status(context, response).await?;

        let created: GoogleEvent = response.json().await.map_err(InfraError::from)?;
        let event = created.into_remote()?;
        debug!(event_id = %event.id, "Created calendar event");
        Ok(event)
    }
}

#[async_trait]
impl EventStore for GoogleCalendarStore {
    async fn events_on_day(&self, date: NaiveDate) -> Result<Vec<RemoteEvent>> {
        let window_end = date + Duration::days(1);
        let time_min = format!("{date}T00:00:00Z");
        let time_max = format!("{window_end}T00:00:00Z");

        self.list_events(&[
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ])
        .await
    }

    async fn upcoming_events(&self, after: DateTime<Utc>, limit: usize) -> Result<Vec<RemoteEvent>> {
        let time_min = after.to_rfc3339_opts(SecondsFormat::Secs, true);
        let max_results = limit.to_string();

        self.list_events(&[
            ("timeMin", time_min.as_str()),
            ("maxResults", max_results.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ])
        .await
    }

    async fn create_timed_event(&self, params: TimedEventParams) -> Result<RemoteEvent> {
        let body = EventWriteBody::timed(&params, &self.timezone);
        self.insert_event("failed to create event", &body).await
    }

    async fn create_all_day_event(&self, params: AllDayEventParams) -> Result<RemoteEvent> {
        let body = EventWriteBody::all_day(&params);
        self.insert_event("failed to create event", &body).await
    }

    async fn get_event(&self, event_id: &str) -> Result<RemoteEvent> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/{}", self.events_url(), urlencoding::encode(event_id));
        let response =
            self.http.get(url).bearer_auth(&token).send().await.map_err(InfraError::from)?;
        let response = check_status("failed to fetch event", response).await?;

        let event: GoogleEvent = response.json().await.map_err(InfraError::from)?;
        event.into_remote()
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/{}", self.events_url(), urlencoding::encode(event_id));
        let response =
            self.http.delete(url).bearer_auth(&token).send().await.map_err(InfraError::from)?;
        check_status("failed to delete event", response).await?;

        debug!(event_id, "Deleted calendar event");
        Ok(())
    }
}

/// Map non-success responses into the domain taxonomy. Credential
/// rejections surface as `Auth`, everything else as `Remote`.
async fn check_status(
    context: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => MailcalError::Auth(format!("{context}: HTTP {status}: {body}")),
        _ => MailcalError::Remote(format!("{context}: HTTP {status}: {body}")),
    })
}
