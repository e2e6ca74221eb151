use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::providers::{get_text, Mode};
use crate::ingest::types::{
    ContestRecord, ContestSource, Platform, StartTime, DEFAULT_DURATION_SECS,
};

pub const DEFAULT_URL: &str = "https://codeforces.com/api/contest.list";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Vec<CodeforcesContest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeforcesContest {
    id: u64,
    name: String,
    phase: String,
    start_time_seconds: Option<i64>,
    duration_seconds: Option<u64>,
}

impl CodeforcesContest {
    fn into_record(self) -> Option<ContestRecord> {
        let start_time_seconds = self.start_time_seconds?;
        Some(ContestRecord {
            name: self.name,
            link: format!("https://codeforces.com/contest/{}", self.id),
            platform: Platform::Codeforces,
            start: StartTime::Epoch { start_time_seconds },
            duration_seconds: self.duration_seconds.unwrap_or(DEFAULT_DURATION_SECS),
        })
    }
}

pub struct CodeforcesProvider {
    mode: Mode,
}

impl CodeforcesProvider {
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

    /// Keep contests that have not started yet (`phase == "BEFORE"`), sorted by start.
    pub fn parse_contests(body: &str) -> Result<Vec<ContestRecord>> {
        let t0 = std::time::Instant::now();
        let resp: ApiResponse = serde_json::from_str(body).context("parsing codeforces json")?;
        if resp.status != "OK" {
            bail!(
                "codeforces api status {}: {}",
                resp.status,
                resp.comment.unwrap_or_default()
            );
        }

        let mut upcoming: Vec<CodeforcesContest> = resp
            .result
            .into_iter()
            .filter(|c| c.phase == "BEFORE")
            .collect();
        upcoming.sort_by_key(|c| c.start_time_seconds);

        let out: Vec<ContestRecord> = upcoming
            .into_iter()
            .filter_map(CodeforcesContest::into_record)
            .collect();

        histogram!("contests_fetch_ms", "platform" => "Codeforces")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("contests_fetched_total", "platform" => "Codeforces")
            .increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl ContestSource for CodeforcesProvider {
    async fn fetch_latest(&self) -> Result<Vec<ContestRecord>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_contests(s),
            Mode::Http { url, client } => {
                let body = get_text(client, url).await.context("codeforces http get()")?;
                Self::parse_contests(&body)
            }
        }
    }

    fn platform(&self) -> Platform {
        Platform::Codeforces
    }
}
