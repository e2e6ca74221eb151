use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::cache::{ContestCache, ALL_CONTESTS_KEY};
use crate::ingest::Aggregator;

pub const CACHE_HEADER: &str = "X-Contests-Cache";
pub const LIVENESS_BODY: &str = "🚀 Contest Aggregator API is live!";

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    cache: Arc<ContestCache>,
    ttl: Duration,
}

impl AppState {
    pub fn new(aggregator: Aggregator, ttl: Duration) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            cache: Arc::new(ContestCache::new()),
            ttl,
        }
    }

    pub fn cache(&self) -> &ContestCache {
        &self.cache
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/contests", get(get_contests))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    LIVENESS_BODY
}

async fn get_contests(State(state): State<AppState>) -> Response {
    if let Some(hit) = state.cache.get(ALL_CONTESTS_KEY) {
        counter!("contests_cache_hits_total").increment(1);
        return ([(CACHE_HEADER, "HIT")], Json(hit.as_slice())).into_response();
    }

    counter!("contests_cache_misses_total").increment(1);
    match state.aggregator.get_all_contests().await {
        Ok(all) => {
            let all = Arc::new(all);
            state
                .cache
                .set(ALL_CONTESTS_KEY, Arc::clone(&all), state.ttl);
            ([(CACHE_HEADER, "MISS")], Json(all.as_slice())).into_response()
        }
        Err(e) => {
            tracing::error!(error = ?e, "aggregation error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch contests" })),
            )
                .into_response()
        }
    }
}
