//! Scheduling semantics: shaping a candidate's date and time string into
//! the interval the remote store expects.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use mailcal_domain::{MailcalError, Result};

/// Parsed form of a candidate's `time` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// Empty time string: the event spans the whole day.
    AllDay,
    /// A single `HH:MM` start with no explicit end.
    At(NaiveTime),
    /// An explicit `HH:MM-HH:MM` range.
    Range(NaiveTime, NaiveTime),
}

impl EventTime {
    /// Parse the three accepted shapes: empty, `HH:MM`, `HH:MM-HH:MM`.
    ///
    /// Anything else is an `InvalidTimeFormat` error carrying the
    /// offending string.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::AllDay);
        }
        let invalid = || MailcalError::InvalidTimeFormat(raw.to_string());
        match raw.split_once('-') {
            Some((start, end)) => {
                let start = parse_clock(start).ok_or_else(invalid)?;
                let end = parse_clock(end).ok_or_else(invalid)?;
                Ok(Self::Range(start, end))
            }
            None => parse_clock(raw).map(Self::At).ok_or_else(invalid),
        }
    }
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

/// Concrete interval for a remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub is_all_day: bool,
}

/// Turn a date and parsed time into the store's interval convention.
///
/// All-day spans use an exclusive end date one day later. A bare start
/// time gets a one-hour default duration. Ranges are taken verbatim; a
/// zero-length or inverted range is passed through, not rejected.
pub fn resolve_window(date: NaiveDate, time: EventTime) -> EventWindow {
    match time {
        EventTime::AllDay => EventWindow {
            start: date.and_time(NaiveTime::MIN),
            end: (date + Duration::days(1)).and_time(NaiveTime::MIN),
            is_all_day: true,
        },
        EventTime::At(start) => {
            let start = date.and_time(start);
            EventWindow { start, end: start + Duration::hours(1), is_all_day: false }
        }
        EventTime::Range(start, end) => EventWindow {
            start: date.and_time(start),
            end: date.and_time(end),
            is_all_day: false,
        },
    }
}
