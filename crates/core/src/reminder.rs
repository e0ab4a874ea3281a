//! Reminder policy for deadline-flagged events.

use chrono::{NaiveTime, Timelike};
use mailcal_domain::ReminderSpec;

use crate::schedule::EventTime;

// Timed deadlines aim the popup at 08:00 local on the event's date.
const MORNING_TARGET_MINUTES: u32 = 8 * 60;

/// Derive the popup reminder for a candidate, if any.
///
/// Only deadline-flagged events get one. Timed deadlines fire at 08:00
/// local, expressed as minutes before the event start and clamped at 0
/// for starts at or before 08:00. All-day deadlines fire at the start of
/// the event day: an all-day start is midnight and the store permits no
/// negative offsets, so an 08:00 popup is not representable there.
pub fn reminder_for(time: EventTime, is_deadline: bool) -> Option<ReminderSpec> {
    if !is_deadline {
        return None;
    }
    let minutes_before_start = match time {
        EventTime::AllDay => 0,
        EventTime::At(start) | EventTime::Range(start, _) => offset_from_morning_target(start),
    };
    Some(ReminderSpec { minutes_before_start })
}

fn offset_from_morning_target(start: NaiveTime) -> u32 {
    let start_minutes = start.hour() * 60 + start.minute();
    start_minutes.saturating_sub(MORNING_TARGET_MINUTES)
}
