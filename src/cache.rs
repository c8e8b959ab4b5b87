//! Cache front-end - main entry point for cache operations.
//!
//! Every public operation follows the same pipeline:
//!
//! ```text
//! caller key ──► CacheKeyBuilder ──► storage key ─┐
//! caller value ─► encode_value ────► text ────────┼──► CacheBackend primitive
//!                                                 │
//! caller result ◄── decode_value / reshape ◄──────┘
//! ```

use crate::backend::{ttl_from_secs, CacheBackend};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::key::CacheKeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::serialization::{decode_value, encode_value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Instant;

/// Which write primitive an operation maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriteMode {
    /// Replace unconditionally.
    Set,
    /// Write only if absent.
    Add,
}

impl WriteMode {
    fn label(self) -> &'static str {
        match self {
            WriteMode::Set => "SET",
            WriteMode::Add => "ADD",
        }
    }
}

/// Backend-agnostic cache.
///
/// Normalizes caller keys into storage keys, encodes values to text (JSON, or
/// plain text with serialization disabled) and forwards to the backend.
/// Absence is `Ok(None)`; a write the backend declined is `Ok(false)`.
///
/// The key prefix and serialization flag are fixed once built: the `with_*`
/// builders consume the cache.
///
/// # Example
///
/// ```
/// use cache_facade::{backend::InMemoryBackend, Cache};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> cache_facade::Result<()> {
/// let cache = Cache::new(InMemoryBackend::new()).with_key_prefix("app:");
///
/// assert_eq!(cache.build_key("user:42")?, "app:user:42");
///
/// cache.set("user:42", &json!({"name": "Alice"}), 0).await?;
/// let user: Option<serde_json::Value> = cache.get("user:42").await?;
/// assert_eq!(user, Some(json!({"name": "Alice"})));
///
/// let missing: Option<String> = cache.get("user:43").await?;
/// assert!(missing.is_none());
/// # Ok(())
/// # }
/// ```
pub struct Cache<B: CacheBackend> {
    backend: B,
    keys: CacheKeyBuilder,
    serialization: bool,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> Cache<B> {
    /// Create a cache with default configuration (no prefix, serialization on).
    pub fn new(backend: B) -> Self {
        Self::from_config(backend, CacheConfig::default())
    }

    /// Create a cache from explicit configuration.
    pub fn from_config(backend: B, config: CacheConfig) -> Self {
        Cache {
            backend,
            keys: CacheKeyBuilder::new(config.key_prefix),
            serialization: config.serialization,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keys = CacheKeyBuilder::new(prefix);
        self
    }

    /// Enable or disable value serialization.
    pub fn with_serialization(mut self, enabled: bool) -> Self {
        self.serialization = enabled;
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn key_prefix(&self) -> &str {
        self.keys.prefix()
    }

    pub fn serialization(&self) -> bool {
        self.serialization
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Build the storage key for a cache key.
    ///
    /// See [`CacheKeyBuilder::build`] for the normalization rules.
    pub fn build_key<K: Serialize + ?Sized>(&self, key: &K) -> Result<String> {
        self.keys.build(key)
    }

    /// Retrieve a value.
    ///
    /// Returns `Ok(None)` when the key is absent or expired; the backend's
    /// absence is never handed to the decoder.
    ///
    /// # Errors
    ///
    /// - `Error::SerializationError`: the key cannot be rendered
    /// - `Error::BackendError`: the backend read failed
    /// - `Error::DeserializationError`: the stored text does not decode to `V`
    pub async fn get<K, V>(&self, key: &K) -> Result<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        let timer = Instant::now();
        let storage_key = self.build_key(key)?;

        let text = self.track(&storage_key, self.backend.get_value(&storage_key).await)?;

        match text {
            Some(text) => {
                let value = self.track(&storage_key, decode_value(&text, self.serialization))?;
                self.metrics.record_hit(&storage_key, timer.elapsed());
                Ok(Some(value))
            }
            None => {
                self.metrics.record_miss(&storage_key, timer.elapsed());
                Ok(None)
            }
        }
    }

    /// Retrieve several values in one batch.
    ///
    /// The result is keyed by the caller's original keys and holds exactly one
    /// entry per distinct key, `None` for those not found. Backend reads go
    /// through [`CacheBackend::get_values`] once, with duplicate storage keys
    /// removed.
    ///
    /// # Errors
    ///
    /// Same cases as [`get`](Cache::get). One undecodable value fails the
    /// whole call.
    pub async fn multi_get<K, V>(&self, keys: &[K]) -> Result<HashMap<K, Option<V>>>
    where
        K: Serialize + Eq + Hash + Clone,
        V: DeserializeOwned,
    {
        let mut storage_keys: HashMap<K, String> = HashMap::with_capacity(keys.len());
        for key in keys {
            if !storage_keys.contains_key(key) {
                storage_keys.insert(key.clone(), self.build_key(key)?);
            }
        }

        let mut distinct: Vec<&str> = storage_keys.values().map(String::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let found = self.backend.get_values(&distinct).await?;

        let mut results = HashMap::with_capacity(storage_keys.len());
        for (key, storage_key) in storage_keys {
            let value = match found.get(&storage_key) {
                Some(text) => Some(decode_value(text, self.serialization)?),
                None => None,
            };
            results.insert(key, value);
        }

        debug!(
            "» Cache MULTI_GET {} keys -> {} hits",
            results.len(),
            found.len()
        );
        Ok(results)
    }

    /// Check whether a key holds a value, without decoding it.
    ///
    /// Costs a full read unless the backend overrides
    /// [`CacheBackend::exists_value`].
    pub async fn exists<K: Serialize + ?Sized>(&self, key: &K) -> Result<bool> {
        let timer = Instant::now();
        let storage_key = self.build_key(key)?;

        let present = self.track(&storage_key, self.backend.exists_value(&storage_key).await)?;

        if present {
            self.metrics.record_hit(&storage_key, timer.elapsed());
        } else {
            self.metrics.record_miss(&storage_key, timer.elapsed());
        }
        Ok(present)
    }

    /// Store a value, replacing any existing one.
    ///
    /// `duration` is the lifetime in seconds; `0` means the entry never
    /// expires. Returns whether the backend stored it.
    ///
    /// # Errors
    ///
    /// - `Error::SerializationError`: the key or value cannot be encoded
    /// - `Error::BackendError`: the backend write failed
    pub async fn set<K, V>(&self, key: &K, value: &V, duration: u64) -> Result<bool>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        self.write_one(WriteMode::Set, key, value, duration).await
    }

    /// Store several values with one shared lifetime.
    ///
    /// Returns the **storage keys** whose write failed; an empty list means
    /// every item was stored. Callers who need their original keys back can
    /// map them through [`build_key`](Cache::build_key).
    ///
    /// # Errors
    ///
    /// Returns `Err` before anything is written if a key or value cannot be
    /// encoded, or if the backend's batch write itself fails.
    pub async fn multi_set<K, V, I>(&self, items: I, duration: u64) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Serialize,
        V: Serialize,
    {
        self.write_many(WriteMode::Set, items, duration).await
    }

    /// Store a value only if the key holds none.
    ///
    /// Returns `Ok(false)` and leaves the existing value untouched when the
    /// key is already present.
    pub async fn add<K, V>(&self, key: &K, value: &V, duration: u64) -> Result<bool>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        self.write_one(WriteMode::Add, key, value, duration).await
    }

    /// Write-if-absent for several values. Returns the storage keys that were
    /// not written.
    pub async fn multi_add<K, V, I>(&self, items: I, duration: u64) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Serialize,
        V: Serialize,
    {
        self.write_many(WriteMode::Add, items, duration).await
    }

    /// Remove a value.
    pub async fn delete<K: Serialize + ?Sized>(&self, key: &K) -> Result<bool> {
        let timer = Instant::now();
        let storage_key = self.build_key(key)?;

        let deleted = self.track(&storage_key, self.backend.delete_value(&storage_key).await)?;

        self.metrics.record_delete(&storage_key, timer.elapsed());
        debug!("» Cache DELETE {} -> {}", storage_key, deleted);
        Ok(deleted)
    }

    /// Remove **everything** in the backing store.
    ///
    /// Not limited to this cache's key prefix: other caches sharing the store
    /// lose their entries too.
    pub async fn flush(&self) -> Result<bool> {
        let flushed = self.backend.flush_values().await?;
        warn!(
            "⚠ Cache FLUSH (prefix {:?}) cleared the whole store -> {}",
            self.keys.prefix(),
            flushed
        );
        Ok(flushed)
    }

    /// Return the cached value, or load, store and return it on a miss.
    ///
    /// The loader runs only on a miss. If it fails nothing is written and its
    /// error is returned. A write the backend declines (for example because
    /// another writer got there first) is logged and the loaded value is
    /// still returned.
    ///
    /// # Example
    ///
    /// ```
    /// use cache_facade::{backend::InMemoryBackend, Cache};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> cache_facade::Result<()> {
    /// let cache = Cache::new(InMemoryBackend::new());
    ///
    /// let total: u64 = cache.get_or_set("report:total", 60, || async { Ok(42) }).await?;
    /// assert_eq!(total, 42);
    ///
    /// // Served from cache; the loader is not called again.
    /// let total: u64 = cache.get_or_set("report:total", 60, || async { Ok(0) }).await?;
    /// assert_eq!(total, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_or_set<K, V, F, Fut>(&self, key: &K, duration: u64, loader: F) -> Result<V>
    where
        K: Serialize + ?Sized,
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        debug!("Cache miss, falling back to loader");
        let value = loader().await?;

        if !self.set(key, &value, duration).await? {
            warn!("⚠ Loaded value was not stored by the backend");
        }

        Ok(value)
    }

    async fn write_one<K, V>(
        &self,
        mode: WriteMode,
        key: &K,
        value: &V,
        duration: u64,
    ) -> Result<bool>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        let timer = Instant::now();
        let storage_key = self.build_key(key)?;
        let text = self.track(&storage_key, encode_value(value, self.serialization))?;
        let ttl = ttl_from_secs(duration);

        let outcome = match mode {
            WriteMode::Set => self.backend.set_value(&storage_key, text, ttl).await,
            WriteMode::Add => self.backend.add_value(&storage_key, text, ttl).await,
        };
        let stored = self.track(&storage_key, outcome)?;

        self.metrics.record_set(&storage_key, timer.elapsed());
        debug!("» Cache {} {} -> {}", mode.label(), storage_key, stored);
        Ok(stored)
    }

    async fn write_many<K, V, I>(
        &self,
        mode: WriteMode,
        items: I,
        duration: u64,
    ) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Serialize,
        V: Serialize,
    {
        let mut encoded = HashMap::new();
        for (key, value) in items {
            let storage_key = self.build_key(&key)?;
            let text = encode_value(&value, self.serialization)?;
            encoded.insert(storage_key, text);
        }

        let count = encoded.len();
        let ttl = ttl_from_secs(duration);

        let failed = match mode {
            WriteMode::Set => self.backend.set_values(encoded, ttl).await?,
            WriteMode::Add => self.backend.add_values(encoded, ttl).await?,
        };

        debug!(
            "» Cache MULTI_{} {} keys -> {} failed",
            mode.label(),
            count,
            failed.len()
        );
        Ok(failed)
    }

    /// Report an error to the metrics handler before propagating it.
    fn track<T>(&self, storage_key: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.metrics.record_error(storage_key, &e.to_string());
        }
        result
    }
}
