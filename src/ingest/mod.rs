// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::config::AppConfig;
use crate::ingest::providers::{
    atcoder::AtCoderProvider, codechef::CodeChefProvider, codeforces::CodeforcesProvider,
};
use crate::ingest::types::{ContestRecord, ContestSource, Platform};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "contests_fetched_total",
            "Contests parsed from providers, per platform."
        );
        describe_counter!(
            "contests_provider_errors_total",
            "Provider fetch/parse errors, per platform."
        );
        describe_histogram!("contests_fetch_ms", "Provider parse time in milliseconds.");
        describe_counter!("contests_cache_hits_total", "GET /contests served from cache.");
        describe_counter!(
            "contests_cache_misses_total",
            "GET /contests that triggered a fan-out."
        );
        describe_gauge!(
            "contests_last_refresh_ts",
            "Unix ts when the aggregate was last recomputed."
        );
    });
}

/// Stable sort by absolute start; records without a resolvable start go last.
pub fn sort_by_start(records: &mut [ContestRecord]) {
    records.sort_by_cached_key(|r| {
        let start = r.start_instant();
        (start.is_none(), start)
    });
}

/// Fans out to every source and merges the results.
pub struct Aggregator {
    sources: Vec<Arc<dyn ContestSource>>,
}

impl Aggregator {
    /// Sources are concatenated in the order given here.
    pub fn new(sources: Vec<Arc<dyn ContestSource>>) -> Self {
        Self { sources }
    }

    /// HTTP providers for every enabled platform, sharing one client.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()
            .context("building http client")?;

        let sources = cfg
            .sources
            .enabled_platforms()
            .into_iter()
            .map(|p| -> Arc<dyn ContestSource> {
                match p {
                    Platform::Codeforces => Arc::new(CodeforcesProvider::from_url(
                        cfg.sources.codeforces_url.as_str(),
                        client.clone(),
                    )),
                    Platform::CodeChef => Arc::new(CodeChefProvider::from_url(
                        cfg.sources.codechef_url.as_str(),
                        client.clone(),
                    )),
                    Platform::AtCoder => Arc::new(AtCoderProvider::from_url(
                        cfg.sources.atcoder_url.as_str(),
                        client.clone(),
                    )),
                }
            })
            .collect();
        Ok(Self::new(sources))
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.sources.iter().map(|s| s.platform()).collect()
    }

    /// Fetch from all sources concurrently, concatenate, sort by start.
    ///
    /// Sources never fail (see [`ContestSource::fetch`]); the only error here
    /// is a source task that panicked.
    pub async fn get_all_contests(&self) -> Result<Vec<ContestRecord>> {
        ensure_metrics_described();

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|s| {
                let s = Arc::clone(s);
                tokio::spawn(async move { s.fetch().await })
            })
            .collect();

        let mut all = Vec::new();
        for (res, source) in futures::future::join_all(handles)
            .await
            .into_iter()
            .zip(&self.sources)
        {
            let mut v = res.with_context(|| format!("{} task failed", source.name()))?;
            all.append(&mut v);
        }

        sort_by_start(&mut all);

        let now = chrono::Utc::now().timestamp().max(0);
        gauge!("contests_last_refresh_ts").set(now as f64);
        tracing::info!(target: "ingest", total = all.len(), "contests aggregated");

        Ok(all)
    }
}
