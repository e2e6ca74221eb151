//! AtCoder has no public contest API, so this provider scrapes the contest
//! listing page. Any markup change upstream makes it return nothing rather
//! than fail the whole aggregate.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::dates::jst;
use crate::ingest::providers::{get_text, Mode};
use crate::ingest::types::{
    ContestRecord, ContestSource, Platform, StartTime, DEFAULT_DURATION_SECS,
};

pub const DEFAULT_URL: &str = "https://atcoder.jp/contests/";
const BASE_URL: &str = "https://atcoder.jp";

static ROW_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".table-default tbody tr").expect("row selector"));
static NAME_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td:nth-child(2) a").expect("name selector"));
static TIME_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("time").expect("time selector"));
static DURATION_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td:nth-child(3)").expect("duration selector"));

/// Raw fields of one listing row, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtCoderRow {
    pub name: String,
    pub href: Option<String>,
    pub raw_time: String,
    pub raw_duration: String,
}

fn text_of(el: Option<ElementRef<'_>>) -> String {
    el.map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

pub fn extract_rows(html: &str) -> Vec<AtCoderRow> {
    let document = Html::parse_document(html);
    document
        .select(&ROW_SEL)
        .map(|row| {
            let anchor = row.select(&NAME_SEL).next();
            AtCoderRow {
                name: text_of(anchor),
                href: anchor.and_then(|a| a.value().attr("href").map(str::to_string)),
                raw_time: text_of(row.select(&TIME_SEL).next()),
                raw_duration: text_of(row.select(&DURATION_SEL).next()),
            }
        })
        .collect()
}

/// Listing timestamps look like `2024-10-04 19:00:00+0900`.
pub fn parse_listing_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S%z").ok()
}

/// `HH:MM` to seconds. Hours may exceed 24 for long contests.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let (h, m) = raw.trim().split_once(':')?;
    let hours: u64 = h.trim().parse().ok()?;
    let minutes: u64 = m.trim().parse().ok()?;
    hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)
}

impl AtCoderRow {
    /// Drops rows that are unnamed, unlinked, unparseable, or already started.
    fn into_record(self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, ContestRecord)> {
        if self.name.is_empty() {
            return None;
        }
        let href = self.href?;
        let start = parse_listing_time(&self.raw_time)?.with_timezone(&Utc);
        if start < now {
            return None;
        }
        let contest_start_date = start
            .with_timezone(&jst())
            .format("%d/%m/%Y, %H:%M:%S")
            .to_string();
        let record = ContestRecord {
            name: self.name,
            link: format!("{BASE_URL}{href}"),
            platform: Platform::AtCoder,
            start: StartTime::Local { contest_start_date },
            duration_seconds: parse_duration(&self.raw_duration).unwrap_or(DEFAULT_DURATION_SECS),
        };
        Some((start, record))
    }
}

pub struct AtCoderProvider {
    mode: Mode,
}

impl AtCoderProvider {
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

    pub fn parse_contests(html: &str, now: DateTime<Utc>) -> Vec<ContestRecord> {
        let t0 = std::time::Instant::now();
        let rows = extract_rows(html);
        if rows.is_empty() {
            tracing::debug!(provider = "AtCoder", "no contest rows found in page");
        }

        let mut dated: Vec<(DateTime<Utc>, ContestRecord)> = rows
            .into_iter()
            .filter_map(|r| r.into_record(now))
            .collect();
        dated.sort_by_key(|(start, _)| *start);
        let out: Vec<ContestRecord> = dated.into_iter().map(|(_, r)| r).collect();

        histogram!("contests_fetch_ms", "platform" => "AtCoder")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("contests_fetched_total", "platform" => "AtCoder").increment(out.len() as u64);
        out
    }
}

#[async_trait]
impl ContestSource for AtCoderProvider {
    async fn fetch_latest(&self) -> Result<Vec<ContestRecord>> {
        let now = Utc::now();
        match &self.mode {
            Mode::Fixture(s) => Ok(Self::parse_contests(s, now)),
            Mode::Http { url, client } => {
                let body = get_text(client, url).await.context("atcoder http get()")?;
                Ok(Self::parse_contests(&body, now))
            }
        }
    }

    fn platform(&self) -> Platform {
        Platform::AtCoder
    }
}
