// tests/common/mod.rs
// Shared helpers: fixture bodies and a call-counting source.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use contest_aggregator::{ContestRecord, ContestSource, Platform, StartTime};

pub const CODEFORCES_JSON: &str = include_str!("../fixtures/codeforces.json");
pub const CODECHEF_JSON: &str = include_str!("../fixtures/codechef.json");
pub const ATCODER_HTML: &str = include_str!("../fixtures/atcoder.html");

pub enum Behavior {
    Records(Vec<ContestRecord>),
    Fail,
    Panic,
}

/// In-memory source that counts how often it is asked to fetch.
pub struct CountingSource {
    pub platform: Platform,
    pub behavior: Behavior,
    pub calls: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(platform: Platform, behavior: Behavior) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let src = Arc::new(Self {
            platform,
            behavior,
            calls: Arc::clone(&calls),
        });
        (src, calls)
    }
}

#[async_trait::async_trait]
impl ContestSource for CountingSource {
    async fn fetch_latest(&self) -> anyhow::Result<Vec<ContestRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Records(v) => Ok(v.clone()),
            Behavior::Fail => Err(anyhow::anyhow!("upstream unreachable")),
            Behavior::Panic => panic!("source blew up"),
        }
    }

    fn platform(&self) -> Platform {
        self.platform
    }
}

pub fn calls(c: &Arc<AtomicUsize>) -> usize {
    c.load(Ordering::SeqCst)
}

pub fn epoch(name: &str, secs: i64) -> ContestRecord {
    ContestRecord {
        name: name.into(),
        link: format!("https://codeforces.com/contest/{secs}"),
        platform: Platform::Codeforces,
        start: StartTime::Epoch {
            start_time_seconds: secs,
        },
        duration_seconds: 7200,
    }
}

pub fn iso(name: &str, start: &str, end: &str) -> ContestRecord {
    ContestRecord {
        name: name.into(),
        link: "https://www.codechef.com/START1".into(),
        platform: Platform::CodeChef,
        start: StartTime::Iso {
            start_time: start.into(),
            end_time: Some(end.into()),
        },
        duration_seconds: 7200,
    }
}

pub fn local(name: &str, start: &str) -> ContestRecord {
    ContestRecord {
        name: name.into(),
        link: "https://atcoder.jp/contests/abc1".into(),
        platform: Platform::AtCoder,
        start: StartTime::Local {
            contest_start_date: start.into(),
        },
        duration_seconds: 6000,
    }
}
