//! In-memory cache backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Automatically handles TTL expiration on access.

use super::CacheBackend;
use crate::error::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// In-memory cache entry with optional expiration.
struct CacheEntry {
    data: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: String, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        CacheEntry { data, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe async in-memory cache backend.
///
/// Clones share the same store. Expired entries are dropped lazily when they
/// are next touched and are treated as absent everywhere, including by
/// `add_value`.
///
/// # Example
///
/// ```no_run
/// use cache_facade::backend::{InMemoryBackend, CacheBackend};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set_value("key1", "value".to_string(), None).await?;
///     assert_eq!(backend.get_value("key1").await?, Some("value".to_string()));
///
///     // Store with TTL
///     backend
///         .set_value("key2", "expires".to_string(), Some(Duration::from_secs(300)))
///         .await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, CacheEntry>>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries in cache, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get memory statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_bytes: usize = self.store.iter().map(|entry| entry.data.len()).sum();
        let expired_count = self.store.iter().filter(|entry| entry.is_expired()).count();

        CacheStats {
            total_entries: self.store.len(),
            expired_entries: expired_count,
            total_bytes,
        }
    }

    /// Read a live value without removing expired entries.
    fn peek(&self, key: &str) -> Option<String> {
        self.store
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.data.clone())
    }

    /// Insert only if the key is vacant or its entry has expired.
    fn insert_if_absent(&self, key: &str, value: String, ttl: Option<Duration>) -> bool {
        match self.store.entry(key.to_string()) {
            Entry::Occupied(mut slot) => {
                if !slot.get().is_expired() {
                    return false;
                }
                slot.insert(CacheEntry::new(value, ttl));
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(CacheEntry::new(value, ttl));
                true
            }
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.peek(key) {
            debug!("✓ InMemory GET {} -> HIT", key);
            return Ok(Some(value));
        }

        // Remove expired entry if it exists
        self.store.remove_if(key, |_, entry| entry.is_expired());
        debug!("✓ InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set_value(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<bool> {
        self.store.insert(key.to_string(), CacheEntry::new(value, ttl));

        if let Some(d) = ttl {
            debug!("✓ InMemory SET {} (TTL: {:?})", key, d);
        } else {
            debug!("✓ InMemory SET {}", key);
        }

        Ok(true)
    }

    async fn add_value(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<bool> {
        let added = self.insert_if_absent(key, value, ttl);
        debug!(
            "✓ InMemory ADD {} -> {}",
            key,
            if added { "STORED" } else { "EXISTS" }
        );
        Ok(added)
    }

    async fn delete_value(&self, key: &str) -> Result<bool> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(true)
    }

    async fn flush_values(&self) -> Result<bool> {
        self.store.clear();
        warn!("⚠ InMemory FLUSH executed - all cache cleared!");
        Ok(true)
    }

    async fn exists_value(&self, key: &str) -> Result<bool> {
        Ok(self.peek(key).is_some())
    }

    async fn get_values(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        let found: HashMap<String, String> = keys
            .iter()
            .filter_map(|k| self.peek(k).map(|v| (k.to_string(), v)))
            .collect();

        debug!("✓ InMemory MGET {} keys -> {} hits", keys.len(), found.len());
        Ok(found)
    }

    async fn set_values(
        &self,
        items: HashMap<String, String>,
        ttl: Option<Duration>,
    ) -> Result<Vec<String>> {
        let count = items.len();
        for (key, value) in items {
            self.store.insert(key, CacheEntry::new(value, ttl));
        }

        debug!("✓ InMemory MSET {} keys", count);
        Ok(Vec::new())
    }

    async fn add_values(
        &self,
        items: HashMap<String, String>,
        ttl: Option<Duration>,
    ) -> Result<Vec<String>> {
        let count = items.len();
        let failed: Vec<String> = items
            .into_iter()
            .filter_map(|(key, value)| {
                if self.insert_if_absent(&key, value, ttl) {
                    None
                } else {
                    Some(key)
                }
            })
            .collect();

        debug!("✓ InMemory MADD {} keys -> {} existed", count, failed.len());
        Ok(failed)
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub total_bytes: usize,
}
