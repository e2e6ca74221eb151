//! Prints the upcoming contests served by a running aggregator, with IST
//! start times and "add to calendar" links.
//!
//! CONTESTS_API_URL defaults to http://localhost:5000.

use anyhow::Context;
use contest_aggregator::{present, ContestRecord};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let base = std::env::var("CONTESTS_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    let url = format!("{}/contests", base.trim_end_matches('/'));

    let records: Vec<ContestRecord> = reqwest::get(&url)
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?
        .json()
        .await
        .context("decoding contest list")?;

    print!("{}", present::render_list(&present::views(&records)));
    Ok(())
}
