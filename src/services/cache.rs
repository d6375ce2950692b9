//! In-process result cache with a fixed time-to-live
//!
//! Entries are stamped with their expiry at insertion and evicted lazily when
//! a read finds them stale. Writes also sweep every expired entry at most once
//! per sweep interval, so keys that are never read again do not pile up.
//! Nothing is ever invalidated by library mutations.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use utoipa::ToSchema;

/// Upper bound on the time between two write-side sweeps
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    next_sweep: Instant,
}

/// Counters reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CacheStats {
    pub keys: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Clone)]
pub struct ResultCache<V> {
    state: Arc<Mutex<CacheState<V>>>,
    ttl: Duration,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
                next_sweep: Instant::now() + ttl.min(MAX_SWEEP_INTERVAL),
            })),
            ttl,
        }
    }

    /// Fresh value for `key`, evicting it first if it has expired
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let now = Instant::now();

        if state.entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            state.entries.remove(key);
        }
        let fresh = state.entries.get(key).map(|entry| entry.value.clone());

        if fresh.is_some() {
            state.hits += 1;
            tracing::debug!(key = %key, "Cache hit");
        } else {
            state.misses += 1;
            tracing::debug!(key = %key, "Cache miss");
        }
        fresh
    }

    /// Insert or overwrite `key`; the TTL restarts from now
    pub async fn set(&self, key: impl Into<String>, value: V) {
        let now = Instant::now();
        let mut state = self.state.lock().await;

        if now >= state.next_sweep {
            let before = state.entries.len();
            state.entries.retain(|_, entry| entry.expires_at > now);
            state.next_sweep = now + self.ttl.min(MAX_SWEEP_INTERVAL);
            tracing::debug!(evicted = before - state.entries.len(), "Cache sweep");
        }

        state.entries.insert(key.into(), CacheEntry { value, expires_at: now + self.ttl });
    }

    /// `keys` counts live entries only
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let now = Instant::now();
        CacheStats {
            keys: state.entries.values().filter(|entry| entry.expires_at > now).count(),
            hits: state.hits,
            misses: state.misses,
        }
    }
}
