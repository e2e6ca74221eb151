use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::providers::{get_text, Mode};
use crate::ingest::types::{
    ContestRecord, ContestSource, Platform, StartTime, DEFAULT_DURATION_SECS,
};

pub const DEFAULT_URL: &str = "https://www.codechef.com/api/list/contests/all";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    future_contests: Vec<CodeChefContest>,
}

#[derive(Debug, Deserialize)]
struct CodeChefContest {
    contest_code: String,
    contest_name: String,
    contest_start_date_iso: String,
    contest_end_date_iso: String,
}

/// `end - start` in seconds, or the default when either side is unreadable.
fn duration_between(start_iso: &str, end_iso: &str) -> u64 {
    let (Ok(start), Ok(end)) = (
        DateTime::parse_from_rfc3339(start_iso),
        DateTime::parse_from_rfc3339(end_iso),
    ) else {
        return DEFAULT_DURATION_SECS;
    };
    u64::try_from((end - start).num_seconds()).unwrap_or(DEFAULT_DURATION_SECS)
}

impl From<CodeChefContest> for ContestRecord {
    fn from(c: CodeChefContest) -> Self {
        let duration_seconds = duration_between(&c.contest_start_date_iso, &c.contest_end_date_iso);
        ContestRecord {
            name: c.contest_name,
            link: format!("https://www.codechef.com/{}", c.contest_code),
            platform: Platform::CodeChef,
            start: StartTime::Iso {
                start_time: c.contest_start_date_iso,
                end_time: Some(c.contest_end_date_iso),
            },
            duration_seconds,
        }
    }
}

pub struct CodeChefProvider {
    mode: Mode,
}

impl CodeChefProvider {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client,
            },
        }
    }

    pub fn parse_contests(body: &str) -> Result<Vec<ContestRecord>> {
        let t0 = std::time::Instant::now();
        let resp: ApiResponse = serde_json::from_str(body).context("parsing codechef json")?;
        let out: Vec<ContestRecord> = resp
            .future_contests
            .into_iter()
            .map(ContestRecord::from)
            .collect();

        histogram!("contests_fetch_ms", "platform" => "CodeChef")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("contests_fetched_total", "platform" => "CodeChef").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl ContestSource for CodeChefProvider {
    async fn fetch_latest(&self) -> Result<Vec<ContestRecord>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_contests(s),
            Mode::Http { url, client } => {
                let body = get_text(client, url).await.context("codechef http get()")?;
                Self::parse_contests(&body)
            }
        }
    }

    fn platform(&self) -> Platform {
        Platform::CodeChef
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_future_contests_and_derives_duration() {
        let body = r#"{"status":"success","future_contests":[{
            "contest_code":"START180","contest_name":"Starters 180",
            "contest_start_date":"09 Apr 2025  20:00:00","contest_end_date":"09 Apr 2025  22:00:00",
            "contest_start_date_iso":"2025-04-09T20:00:00+05:30",
            "contest_end_date_iso":"2025-04-09T22:00:00+05:30",
            "contest_duration":"120","distinct_users":0}],
            "past_contests":[]}"#;
        let out = CodeChefProvider::parse_contests(body).unwrap();
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.name, "Starters 180");
        assert_eq!(c.link, "https://www.codechef.com/START180");
        assert_eq!(c.duration_seconds, 7200);
        assert_eq!(
            c.start,
            StartTime::Iso {
                start_time: "2025-04-09T20:00:00+05:30".into(),
                end_time: Some("2025-04-09T22:00:00+05:30".into()),
            }
        );
    }

    #[test]
    fn unreadable_or_negative_duration_falls_back() {
        assert_eq!(duration_between("garbage", "2025-04-09T22:00:00+05:30"), 7200);
        assert_eq!(
            duration_between("2025-04-09T22:00:00+05:30", "2025-04-09T20:00:00+05:30"),
            7200
        );
    }

    #[test]
    fn missing_future_list_is_an_error() {
        assert!(CodeChefProvider::parse_contests(r#"{"status":"error"}"#).is_err());
    }
}
