//! TTL and category validated response cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::entry::CacheEntry;
use crate::cache::store::{FileStore, KvStore, MemoryStore, StoreError};
use crate::config::CacheConfig;
use crate::observability::metrics;

/// Caches fetched payloads over a [`KvStore`].
///
/// Entries are checked on every read: an expired entry, one stored under a
/// different category, or an undecodable blob is purged and reported as a
/// miss. Store failures are logged and never fail the caller.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KvStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self::with_clock(store, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KvStore>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { store, ttl, clock }
    }

    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), ttl)
    }

    /// File-backed when `persistence_path` is set, in-memory otherwise.
    pub fn from_config(config: &CacheConfig) -> Result<Self, StoreError> {
        let ttl = Duration::from_secs(config.ttl_secs);
        match &config.persistence_path {
            Some(path) => Ok(Self::new(Arc::new(FileStore::open(path)?), ttl)),
            None => Ok(Self::in_memory(ttl)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Valid payload for `key` under `category`, purging anything invalid.
    pub fn lookup(&self, key: &str, category: &str) -> Option<Value> {
        let blob = match self.store.get(key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                metrics::record_cache("miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, treating as miss");
                metrics::record_cache("miss");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&blob) {
            Ok(entry) if entry.is_valid_for(category, self.clock.now_millis(), self.ttl) => {
                tracing::debug!(key, category, "Cache hit");
                metrics::record_cache("hit");
                Some(entry.payload)
            }
            Ok(entry) => {
                tracing::debug!(
                    key,
                    category,
                    stored_tag = %entry.tag,
                    "Discarding stale or mismatched cache entry"
                );
                metrics::record_cache("stale");
                self.purge(key);
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                metrics::record_cache("stale");
                self.purge(key);
                None
            }
        }
    }

    /// Store `payload` under `key`, tagged with `category` and the current time.
    pub fn put(&self, key: &str, category: &str, payload: &Value) {
        let entry = CacheEntry::new(payload.clone(), category, self.clock.now_millis());
        let result = serde_json::to_string(&entry)
            .map_err(StoreError::from)
            .and_then(|blob| self.store.set(key, blob));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "Cache write failed");
        }
    }

    pub fn purge(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "Cache purge failed");
        }
    }

    /// Return the cached payload for `key`, or run `fetch` and cache its
    /// success. `force_refresh` purges first and always calls `fetch`.
    /// Errors from `fetch` are returned as-is and never cached.
    ///
    /// The check-fetch-store sequence is not atomic; concurrent misses on the
    /// same key both fetch and the last write wins.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        category: &str,
        fetch: F,
        force_refresh: bool,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if force_refresh {
            metrics::record_cache("forced");
            self.purge(key);
        } else if let Some(payload) = self.lookup(key, category) {
            return Ok(payload);
        }

        let payload = fetch().await?;
        self.put(key, category, &payload);
        Ok(payload)
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl_secs", &self.ttl.as_secs())
            .finish_non_exhaustive()
    }
}
