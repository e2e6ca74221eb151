//! Integration tests for /contests cache behavior with counting sources.
//!
//! Covered (strict):
//! - MISS → HIT, byte-identical body, no second fan-out
//! - Expiration after TTL → exactly one fresh fan-out
//! - Presence of cache diagnostics header `X-Contests-Cache`
//!
//! Time is paused, so TTL is driven by `tokio::time::advance`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{self, Body, Bytes},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt; // for oneshot

use common::{calls, epoch, local, Behavior, CountingSource};
use contest_aggregator::api::CACHE_HEADER;
use contest_aggregator::cache::ALL_CONTESTS_KEY;
use contest_aggregator::{router, Aggregator, AppState, ContestSource, Platform};

const TTL: Duration = Duration::from_secs(600);

/// Helper: GET /contests. Returns (status, cache header, body).
async fn get_contests(app: &Router) -> (StatusCode, String, Bytes) {
    let req = Request::builder()
        .method("GET")
        .uri("/contests")
        .body(Body::empty())
        .expect("request build");
    let resp = app.clone().oneshot(req).await.expect("router response");
    let status = resp.status();
    let cache = resp
        .headers()
        .get(CACHE_HEADER)
        .expect("X-Contests-Cache header must be present")
        .to_str()
        .expect("header must be ASCII")
        .to_string();
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    (status, cache, bytes)
}

fn setup() -> (Router, AppState, Vec<Arc<std::sync::atomic::AtomicUsize>>) {
    let (cf, cf_calls) = CountingSource::new(
        Platform::Codeforces,
        Behavior::Records(vec![epoch("Round", 4_070_908_800)]),
    );
    let (ac, ac_calls) = CountingSource::new(
        Platform::AtCoder,
        Behavior::Records(vec![local("ABC", "02/01/2099, 21:00:00")]),
    );
    let sources: Vec<Arc<dyn ContestSource>> = vec![cf, ac];
    let state = AppState::new(Aggregator::new(sources), TTL);
    (router(state.clone()), state, vec![cf_calls, ac_calls])
}

fn fan_outs(counters: &[Arc<std::sync::atomic::AtomicUsize>]) -> Vec<usize> {
    counters.iter().map(calls).collect()
}

#[tokio::test(start_paused = true)]
async fn hit_within_ttl_is_byte_identical_and_skips_sources() {
    let (app, state, counters) = setup();

    let (s1, c1, b1) = get_contests(&app).await;
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(c1, "MISS", "first request should be MISS");
    assert_eq!(fan_outs(&counters), vec![1, 1]);
    assert!(state.cache().get(ALL_CONTESTS_KEY).is_some());

    tokio::time::advance(TTL - Duration::from_secs(1)).await;

    let (s2, c2, b2) = get_contests(&app).await;
    assert_eq!(s2, StatusCode::OK);
    assert_eq!(c2, "HIT", "second request inside TTL should be HIT");
    assert_eq!(b1, b2, "cached body must be byte-identical");
    assert_eq!(fan_outs(&counters), vec![1, 1], "HIT must not re-invoke sources");
}

#[tokio::test(start_paused = true)]
async fn expiry_triggers_exactly_one_fresh_fan_out() {
    let (app, _state, counters) = setup();

    let (_, c1, _) = get_contests(&app).await;
    assert_eq!(c1, "MISS");

    // Absolute TTL, no sliding refresh
    tokio::time::advance(TTL + Duration::from_secs(1)).await;

    let (s3, c3, _) = get_contests(&app).await;
    assert_eq!(s3, StatusCode::OK);
    assert_eq!(c3, "MISS", "after TTL expiration the request must be MISS");
    assert_eq!(fan_outs(&counters), vec![2, 2]);

    let (_, c4, _) = get_contests(&app).await;
    assert_eq!(c4, "HIT", "refreshed entry must be served next");
    assert_eq!(fan_outs(&counters), vec![2, 2]);
}

#[tokio::test(start_paused = true)]
async fn failed_aggregation_is_not_cached() {
    let (cf, cf_calls) = CountingSource::new(Platform::Codeforces, Behavior::Panic);
    let sources: Vec<Arc<dyn ContestSource>> = vec![cf];
    let state = AppState::new(Aggregator::new(sources), TTL);
    let app = router(state.clone());

    for _ in 0..2 {
        let req = Request::builder()
            .uri("/contests")
            .body(Body::empty())
            .expect("request build");
        let resp = app.clone().oneshot(req).await.expect("router response");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert_eq!(calls(&cf_calls), 2);
    assert!(state.cache().is_empty());
}
