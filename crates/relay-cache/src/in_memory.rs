use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use relay_core::{CacheHit, CacheMetadata, GatewayError, ResultCache};
use serde_json::Value;
use tokio::sync::RwLock;

struct StoredEntry {
    result: Value,
    metadata: CacheMetadata,
    created_at: Instant,
}

/// Point-in-time counters for cache effectiveness.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub entry_count: usize,
    pub hit_rate: f64,
}

/// In-memory result cache keyed by `(fingerprint, service)`.
///
/// Expiration is lazy: each read checks the entry's age against the
/// caller-supplied max age and reports a miss once `age > max_age`. Expired
/// entries stay in the map until overwritten or cleared; logical expiry is
/// the contract, physical deletion is not.
pub struct InMemoryCache {
    store: RwLock<HashMap<(String, String), StoredEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn metrics(&self) -> CacheMetrics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheMetrics {
            hits,
            misses,
            entry_count: self.store.read().await.len(),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    async fn get(
        &self,
        fingerprint: &str,
        service: &str,
        max_age: Duration,
    ) -> Result<Option<CacheHit>, GatewayError> {
        let store = self.store.read().await;
        let entry = match store.get(&(fingerprint.to_string(), service.to_string())) {
            Some(entry) => entry,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
        };

        let age = entry.created_at.elapsed();
        if !is_fresh(age, max_age) {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(fingerprint, service, ?age, "cache entry expired");
            return Ok(None);
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(Some(CacheHit {
            result: entry.result.clone(),
            metadata: entry.metadata.clone(),
            age,
        }))
    }

    async fn put(
        &self,
        fingerprint: &str,
        service: &str,
        result: &Value,
        metadata: CacheMetadata,
    ) -> Result<(), GatewayError> {
        let mut store = self.store.write().await;
        store.insert(
            (fingerprint.to_string(), service.to_string()),
            StoredEntry {
                result: result.clone(),
                metadata,
                created_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), GatewayError> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }
}

/// Inclusive boundary: an entry aged exactly `max_age` is still fresh.
fn is_fresh(age: Duration, max_age: Duration) -> bool {
    age <= max_age
}
