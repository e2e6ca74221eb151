//! # Date reconciliation
//! Every upstream reports start times differently: Codeforces sends epoch
//! seconds, CodeChef sends ISO-8601 with an offset, and the AtCoder scrape is
//! re-rendered as `DD/MM/YYYY, HH:mm:ss` in JST. Consumers resolve all of them
//! into one absolute instant here, then render it in IST for display.
//!
//! The offsets are fixed per pattern and must not be swapped:
//! - `DD/MM/YYYY, HH:mm:ss` is JST (+09:00)
//! - `DD Mon YYYY HH:mm:ss` is IST (+05:30)

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// JST, used by AtCoder.
pub const JST_OFFSET_SECS: i32 = 9 * 3600;
/// IST, used by CodeChef's human-readable dates and for display.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

static RE_SLASHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2})/(\d{2})/(\d{4}),\s*(\d{2}):(\d{2}):(\d{2})").expect("slashed date regex")
});
static RE_MONTH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2})\s+(\w{3})\s+(\d{4})\s+(\d{2}):(\d{2}):(\d{2})")
        .expect("month-name date regex")
});
static RE_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",+").expect("comma regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

const MONTHS: [(&str, u32); 12] = [
    ("Jan", 1),
    ("Feb", 2),
    ("Mar", 3),
    ("Apr", 4),
    ("May", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Aug", 8),
    ("Sep", 9),
    ("Oct", 10),
    ("Nov", 11),
    ("Dec", 12),
];

/// A start/end value as it appears on the wire: either epoch seconds or a
/// formatted string whose format depends on the originating platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Epoch(i64),
    Text(String),
}

pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("valid JST offset")
}

pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("valid IST offset")
}

fn month_number(abbr: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == abbr)
        .map(|(_, n)| *n)
}

fn normalize_input(s: &str) -> String {
    let out = RE_COMMAS.replace(s, ",");
    RE_WS.replace_all(&out, " ").trim().to_string()
}

fn at_offset(
    offset: FixedOffset,
    (year, month, day): (i32, u32, u32),
    (hour, minute, second): (u32, u32, u32),
) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    offset.from_local_datetime(&naive).single()
}

fn num<T: std::str::FromStr>(caps: &regex::Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

/// Parse one of the formatted start strings into an absolute instant.
///
/// Tries `DD/MM/YYYY, HH:mm:ss` (JST), then `DD Mon YYYY HH:mm:ss` (IST), then
/// generic ISO/RFC formats. Returns `None` when nothing matches.
pub fn parse_source_datetime(input: &str) -> Option<DateTime<FixedOffset>> {
    let cleaned = normalize_input(input);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(c) = RE_SLASHED.captures(&cleaned) {
        return at_offset(
            jst(),
            (num(&c, 3)?, num(&c, 2)?, num(&c, 1)?),
            (num(&c, 4)?, num(&c, 5)?, num(&c, 6)?),
        );
    }

    if let Some(c) = RE_MONTH_NAME.captures(&cleaned) {
        let month = month_number(c.get(2)?.as_str())?;
        return at_offset(
            ist(),
            (num(&c, 3)?, month, num(&c, 1)?),
            (num(&c, 4)?, num(&c, 5)?, num(&c, 6)?),
        );
    }

    parse_generic(&cleaned)
}

fn parse_generic(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    // No offset at all: read as UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    None
}

/// Resolve a wire time value to an absolute UTC instant.
pub fn resolve_instant(value: &TimeValue) -> Option<DateTime<Utc>> {
    match value {
        TimeValue::Epoch(secs) => DateTime::<Utc>::from_timestamp(*secs, 0),
        TimeValue::Text(s) => parse_source_datetime(s).map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Like [`resolve_instant`], but never fails: an unparseable value is logged
/// and replaced by the current instant.
pub fn resolve_instant_or_now(value: &TimeValue) -> DateTime<Utc> {
    match resolve_instant(value) {
        Some(dt) => dt,
        None => {
            tracing::warn!(value = ?value, "date parse error, substituting now");
            Utc::now()
        }
    }
}

/// Render an instant in IST as `DD/MM/YYYY, hh:mm:ss am|pm`.
pub fn format_display(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&ist())
        .format("%d/%m/%Y, %I:%M:%S %P")
        .to_string()
}
