//! Response caching with TTL support

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::Instant;

mod key;

pub use key::fingerprint;

/// Cache entry with expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached response payload
    pub data: Value,
    /// When the entry was stored
    pub stored_at: Instant,
    /// First instant at which the entry is no longer served
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Create cache entry living for `ttl` from now
    pub fn new(data: Value, ttl: Duration) -> Self {
        let stored_at = Instant::now();
        Self {
            data,
            stored_at,
            expires_at: stored_at + ttl,
        }
    }

    /// Check if cache entry is still fresh
    pub fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }

    /// Get age of cache entry
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}

/// In-memory response cache keyed by request fingerprint.
///
/// Expiry is only checked on reads; nothing sweeps the map in the background.
/// There is no capacity bound.
#[derive(Debug, Default)]
pub struct ResponseCache {
    /// Cache storage
    entries: DashMap<String, CacheEntry>,
}

impl ResponseCache {
    /// Create new, empty response cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get cached payload if fresh, evicting it otherwise
    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh() {
            return Some(entry.data.clone());
        }
        // Release the shard read lock before removing
        drop(entry);
        self.entries.remove_if(key, |_, entry| !entry.is_fresh());
        None
    }

    /// Store payload, replacing any previous entry for the key
    pub fn put(&self, key: impl Into<String>, data: Value, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(data, ttl));
    }

    /// Drop a single entry, returning whether one existed
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of stored entries, fresh or not
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove stale entries
    pub fn cleanup(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.is_fresh() {
                true
            } else {
                removed += 1;
                false
            }
        });
        removed
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut fresh_entries = 0;
        let mut stale_entries = 0;

        for entry in self.entries.iter() {
            if entry.is_fresh() {
                fresh_entries += 1;
            } else {
                stale_entries += 1;
            }
        }

        CacheStats {
            total_entries: fresh_entries + stale_entries,
            fresh_entries,
            stale_entries,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Number of fresh entries
    pub fresh_entries: usize,
    /// Number of stale entries
    pub stale_entries: usize,
}

/// Handle for inspecting and resetting a pipeline's cache from outside.
///
/// `set` applies the TTL the owning pipeline was configured with.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache: Arc<ResponseCache>,
    ttl: Duration,
}

impl CacheManager {
    pub fn new(cache: Arc<ResponseCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn size(&self) -> usize {
        self.cache.size()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.cache.get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.cache.put(key, value, self.ttl);
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
