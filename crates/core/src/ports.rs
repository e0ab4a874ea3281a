//! Port interfaces for calendar ingestion
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mailcal_domain::{AllDayEventParams, RemoteEvent, Result, TimedEventParams};

/// Trait for the remote calendar store.
///
/// The target calendar is bound when the adapter is constructed; every
/// read goes back to the remote store (no local caching).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events on a calendar day, ordered by start time, with
    /// recurring entries expanded to single instances.
    async fn events_on_day(&self, date: NaiveDate) -> Result<Vec<RemoteEvent>>;

    /// Upcoming events after `after`, ordered by start time.
    async fn upcoming_events(&self, after: DateTime<Utc>, limit: usize)
        -> Result<Vec<RemoteEvent>>;

    /// Create a timed event.
    async fn create_timed_event(&self, params: TimedEventParams) -> Result<RemoteEvent>;

    /// Create an all-day event.
    async fn create_all_day_event(&self, params: AllDayEventParams) -> Result<RemoteEvent>;

    /// Retrieve a single event by id.
    async fn get_event(&self, event_id: &str) -> Result<RemoteEvent>;

    /// Delete an event by id.
    async fn delete_event(&self, event_id: &str) -> Result<()>;
}

/// Trait for the generative-text oracle.
///
/// A single completion shape; the extraction and duplicate-judgment
/// prompts are built on top of it by the core services.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send one user prompt and return the raw completion text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}
