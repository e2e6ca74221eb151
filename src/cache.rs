//! # Contest cache
//! In-memory TTL cache for the aggregated contest list.
//!
//! Absolute TTL, no sliding refresh: an entry expires `ttl` after it was set,
//! no matter how often it is read. Expired entries are dropped on read. Uses
//! `tokio::time::Instant` so tests can pause and advance the clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::ingest::types::ContestRecord;

/// The only key the API uses.
pub const ALL_CONTESTS_KEY: &str = "allContests";

pub type Contests = Arc<Vec<ContestRecord>>;

#[derive(Debug)]
struct Entry {
    value: Contests,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct ContestCache {
    inner: Mutex<HashMap<String, Entry>>,
}

impl ContestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Contests> {
        let now = Instant::now();
        let mut map = self.inner.lock().expect("contest cache mutex poisoned");
        let fresh = map
            .get(key)
            .filter(|e| now < e.expires_at)
            .map(|e| Arc::clone(&e.value));
        if fresh.is_none() {
            map.remove(key);
        }
        fresh
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: Contests, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut map = self.inner.lock().expect("contest cache mutex poisoned");
        map.insert(key.to_string(), entry);
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let map = self.inner.lock().expect("contest cache mutex poisoned");
        map.values().filter(|e| now < e.expires_at).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
