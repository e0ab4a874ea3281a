//! Common data types used throughout the application

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An event extracted from an email bulletin, awaiting reconciliation
/// against the remote calendar.
///
/// `time` is one of three shapes: empty (all-day), `HH:MM`, or
/// `HH:MM-HH:MM`. The shape is validated by the ingestion pipeline, not at
/// construction; a `CandidateEvent` read from a file may carry a malformed
/// value until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub date: NaiveDate,
    pub time: String,
    pub description: String,
    pub is_deadline: bool,
}

/// A point on the remote store's timeline: a clocked instant for timed
/// events, a bare date for all-day events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStamp {
    Instant(DateTime<FixedOffset>),
    Day(NaiveDate),
}

impl EventStamp {
    /// Calendar date this stamp falls on.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Instant(dt) => dt.date_naive(),
            Self::Day(d) => *d,
        }
    }
}

impl fmt::Display for EventStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Day-scoped projection of an existing calendar entry.
///
/// Owned by the remote store; read for duplicate comparison and CLI
/// display, never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub title: String,
    pub start: EventStamp,
    pub end: EventStamp,
    pub description: Option<String>,
    pub location: Option<String>,
    pub html_link: Option<String>,
}

/// Popup reminder attached to a create request, in minutes before the
/// event start. Deadline-flagged candidates get one; everything else gets
/// the store's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub minutes_before_start: u32,
}

/// Parameters for creating a timed event.
///
/// `start`/`end` are wall-clock values; the store adapter attaches the
/// configured timezone label on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEventParams {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: Option<String>,
    pub location: Option<String>,
    pub reminder: Option<ReminderSpec>,
}

/// Parameters for creating an all-day event. The store's exclusive end
/// date (`date + 1`) is applied by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllDayEventParams {
    pub title: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub location: Option<String>,
    pub reminder: Option<ReminderSpec>,
}

/// Tally returned by one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub created: usize,
    pub skipped: usize,
}
