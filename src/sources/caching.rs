use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::clock::Clock;

/// Default freshness window for upstream responses.
pub const DEFAULT_TTL_SECS: i64 = 60;
pub const DEFAULT_MAX_ENTRIES: usize = 16;

#[derive(Debug, Clone)]
struct CachedResponse {
    body: String,
    fetched_at: DateTime<Utc>,
}

/// In-memory cache of successful upstream bodies, keyed by request URL and
/// valid for a fixed freshness window.  Reuse is a hint: a miss simply means
/// the caller fetches again.
pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
    data: Mutex<HashMap<String, CachedResponse>>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("len", &self.len())
            .finish()
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self { ttl, max_entries: max_entries.max(1), clock, data: Mutex::new(HashMap::new()) }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.retain(|_, v| now - v.fetched_at < self.ttl);

        let hit = data.get(key).map(|x| x.body.clone());
        trace!(key, hit = hit.is_some(), "Response cache lookup");
        hit
    }

    pub fn insert(&self, key: &str, body: String) {
        let now = self.clock.now();
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.retain(|_, v| now - v.fetched_at < self.ttl);

        if data.len() >= self.max_entries && !data.contains_key(key) {
            // Evict the oldest entry
            if let Some(victim) = data.iter()
                .min_by_key(|(_, v)| v.fetched_at)
                .map(|(k, _)| k.clone())
            {
                data.remove(&victim);
            }
        }
        data.insert(key.to_string(), CachedResponse { body, fetched_at: now });
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
