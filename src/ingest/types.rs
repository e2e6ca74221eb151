// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::dates::{resolve_instant, TimeValue};

/// Assumed contest length when the upstream does not say.
pub const DEFAULT_DURATION_SECS: u64 = 2 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Codeforces,
    CodeChef,
    AtCoder,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Codeforces, Platform::CodeChef, Platform::AtCoder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::CodeChef => "CodeChef",
            Platform::AtCoder => "AtCoder",
        }
    }

    /// Case-insensitive lookup, used by the `enabled` list in config.
    pub fn from_name(s: &str) -> Option<Platform> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record's start time is carried on the wire. Each platform keeps the
/// field names the front-end already knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartTime {
    /// Codeforces: unix seconds.
    Epoch {
        #[serde(rename = "startTimeSeconds")]
        start_time_seconds: i64,
    },
    /// CodeChef: ISO-8601 strings passed through from upstream.
    Iso {
        #[serde(rename = "startTime")]
        start_time: String,
        #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
        end_time: Option<String>,
    },
    /// AtCoder: `DD/MM/YYYY, HH:mm:ss` in JST.
    Local { contest_start_date: String },
}

impl StartTime {
    pub fn start_value(&self) -> TimeValue {
        match self {
            StartTime::Epoch { start_time_seconds } => TimeValue::Epoch(*start_time_seconds),
            StartTime::Iso { start_time, .. } => TimeValue::Text(start_time.clone()),
            StartTime::Local { contest_start_date } => TimeValue::Text(contest_start_date.clone()),
        }
    }

    pub fn end_value(&self) -> Option<TimeValue> {
        match self {
            StartTime::Iso {
                end_time: Some(end),
                ..
            } => Some(TimeValue::Text(end.clone())),
            _ => None,
        }
    }
}

/// Normalized contest listing, as served on `GET /contests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub name: String,
    pub link: String,
    pub platform: Platform,
    #[serde(flatten)]
    pub start: StartTime,
    #[serde(rename = "durationSeconds", default)]
    pub duration_seconds: u64,
}

impl ContestRecord {
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        resolve_instant(&self.start.start_value())
    }

    /// Start + duration; falls back to the explicit end time, then to the
    /// default two hours.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        let start = self.start_instant()?;
        Some(end_from(start, self))
    }
}

/// A duration that does not fit the calendar is treated as missing.
pub(crate) fn end_from(start: DateTime<Utc>, rec: &ContestRecord) -> DateTime<Utc> {
    let by_duration = Some(rec.duration_seconds)
        .filter(|d| *d > 0)
        .and_then(|d| i64::try_from(d).ok())
        .and_then(Duration::try_seconds)
        .and_then(|d| start.checked_add_signed(d));
    if let Some(end) = by_duration {
        return end;
    }
    if let Some(end) = rec.start.end_value().as_ref().and_then(resolve_instant) {
        return end;
    }
    start + Duration::seconds(DEFAULT_DURATION_SECS as i64)
}

#[async_trait::async_trait]
pub trait ContestSource: Send + Sync {
    /// Fetch and normalize upcoming contests. May fail.
    async fn fetch_latest(&self) -> Result<Vec<ContestRecord>>;

    fn platform(&self) -> Platform;

    fn name(&self) -> &'static str {
        self.platform().as_str()
    }

    /// Fail-soft wrapper: any error is logged and becomes an empty list.
    async fn fetch(&self) -> Vec<ContestRecord> {
        match self.fetch_latest().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, provider = self.name(), "provider error");
                counter!("contests_provider_errors_total", "platform" => self.name())
                    .increment(1);
                Vec::new()
            }
        }
    }
}
