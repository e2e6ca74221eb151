//! Google Calendar "add event" deep links.

use chrono::{DateTime, Utc};

use crate::dates::resolve_instant_or_now;
use crate::ingest::types::{end_from, ContestRecord};

pub const EVENT_EDIT_URL: &str = "https://calendar.google.com/calendar/r/eventedit";

/// Basic ISO-8601 in UTC with separators and fractions stripped, e.g. `20250328T063000Z`.
pub fn calendar_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Event start and end. An unreadable start is replaced by now (and logged).
pub fn event_window(rec: &ContestRecord) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = resolve_instant_or_now(&rec.start.start_value());
    (start, end_from(start, rec))
}

pub fn calendar_link(rec: &ContestRecord) -> String {
    let (start, end) = event_window(rec);
    format!(
        "{EVENT_EDIT_URL}?text={}&dates={}/{}",
        urlencoding::encode(&rec.name),
        calendar_stamp(start),
        calendar_stamp(end)
    )
}
