//! Contest Aggregator: binary entrypoint
//! Boots the Axum HTTP server: config, tracing, metrics, routes.

use anyhow::Context;
use contest_aggregator::{telemetry::Metrics, AppConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; JSON lines when LOG_FORMAT=json.
/// Filter comes from RUST_LOG, falling back to our crate at info.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contest_aggregator=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load()?;
    let metrics = Metrics::init(cfg.cache_ttl_secs)?;
    let app = contest_aggregator::app(&cfg)?.merge(metrics.router());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("✅ Server running on http://localhost:{}", cfg.port);

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
