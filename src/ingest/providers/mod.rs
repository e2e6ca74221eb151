pub mod atcoder;
pub mod codechef;
pub mod codeforces;

use anyhow::{Context, Result};

/// Where a provider reads its upstream body from.
pub(crate) enum Mode {
    /// Stored body, parsed as-is (tests, offline runs).
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

/// GET a URL and return the body; non-2xx is an error.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;
    resp.text().await.context("reading response body")
}
