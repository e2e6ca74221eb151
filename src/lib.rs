// src/lib.rs
// Public library surface for the server binary, the CLI, and integration tests.

pub mod api;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod dates;
pub mod ingest;
pub mod present;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::ingest::types::{ContestRecord, ContestSource, Platform, StartTime};
pub use crate::ingest::Aggregator;

use axum::Router;
use tracing::info;

/// Build the full HTTP app (without `/metrics`) from configuration.
pub fn app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let aggregator = Aggregator::from_config(cfg)?;
    info!(
        platforms = ?aggregator.platforms(),
        cache_ttl_secs = cfg.cache_ttl_secs,
        "aggregator ready"
    );
    let state = AppState::new(aggregator, cfg.cache_ttl());
    Ok(router(state))
}
