//! Cached payload record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// One cached payload, stored as a JSON blob `{payload, tag, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Value,
    /// Category the payload was fetched under (e.g. payment gateway).
    pub tag: String,
    /// Store time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl CacheEntry {
    pub fn new(payload: Value, tag: impl Into<String>, timestamp: u64) -> Self {
        Self {
            payload,
            tag: tag.into(),
            timestamp,
        }
    }

    /// Younger than `ttl` at `now`. Entries stamped after `now` are never
    /// fresh.
    pub fn is_fresh(&self, now_millis: u64, ttl: Duration) -> bool {
        match now_millis.checked_sub(self.timestamp) {
            Some(age) => u128::from(age) < ttl.as_millis(),
            None => false,
        }
    }

    /// Fresh and stored under `category`.
    pub fn is_valid_for(&self, category: &str, now_millis: u64, ttl: Duration) -> bool {
        self.tag == category && self.is_fresh(now_millis, ttl)
    }
}
