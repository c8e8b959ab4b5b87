//! Cache backend contract.
//!
//! A backend stores opaque text under storage keys and owns expiry. It never
//! sees the caller's original key shape or value type: the [`Cache`] front-end
//! has already normalized keys and encoded values by the time a primitive is
//! called.
//!
//! [`Cache`]: crate::Cache

use crate::error::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;

pub mod inmemory;

pub use inmemory::InMemoryBackend;

/// Trait for cache backend implementations.
///
/// Five primitives are required. The existence probe and the three batch
/// operations have defaults built from those primitives; backends with native
/// support (multi-key reads, pipelined writes, a real EXISTS) should override
/// them, since the defaults are correct but cost one primitive call per key.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow concurrent access.
/// Backend implementations should use interior mutability (DashMap, Mutex, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
///
/// # Return conventions
///
/// - `Ok(None)` from a read means absent or expired. An empty string is a
///   legitimate stored value.
/// - `Ok(false)` from a write means the store declined it (e.g. `add_value` on
///   an existing key).
/// - `Err(_)` means the call itself failed.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve the text stored under a storage key.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs (connection lost, etc.)
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store text under a storage key, replacing any existing value.
    ///
    /// `ttl` of `None` means the entry never expires.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn set_value(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<bool>;

    /// Store text only if the key holds no live value.
    ///
    /// Must return `Ok(false)` and leave the existing value untouched when the
    /// key is already present.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn add_value(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<bool>;

    /// Remove the value stored under a storage key.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn delete_value(&self, key: &str) -> Result<bool>;

    /// Remove every value in the store, regardless of key prefix.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn flush_values(&self) -> Result<bool>;

    /// Check whether a storage key holds a live value.
    ///
    /// Default implementation performs a full read.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn exists_value(&self, key: &str) -> Result<bool> {
        Ok(self.get_value(key).await?.is_some())
    }

    /// Bulk read (optional optimization).
    ///
    /// Returns only the keys that hold a value. Default implementation issues
    /// one `get_value()` per key concurrently and waits for all of them; the
    /// first backend error among them is returned.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn get_values(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        let reads = keys.iter().map(|key| async move {
            let value = self.get_value(key).await;
            (*key, value)
        });

        let mut found = HashMap::with_capacity(keys.len());
        for (key, value) in join_all(reads).await {
            if let Some(text) = value? {
                found.insert(key.to_string(), text);
            }
        }

        debug!(
            "Default GET_VALUES {} keys -> {} hits",
            keys.len(),
            found.len()
        );
        Ok(found)
    }

    /// Bulk unconditional write (optional optimization).
    ///
    /// Returns the keys whose write failed. Default implementation issues one
    /// `set_value()` per entry concurrently; a backend error on one entry marks
    /// that key as failed without aborting the others.
    ///
    /// # Errors
    /// Default implementation never returns `Err`.
    async fn set_values(
        &self,
        items: HashMap<String, String>,
        ttl: Option<Duration>,
    ) -> Result<Vec<String>> {
        let writes = items.into_iter().map(|(key, value)| async move {
            let outcome = self.set_value(&key, value, ttl).await;
            (key, outcome)
        });

        let failed = collect_failures("SET", join_all(writes).await);
        debug!("Default SET_VALUES -> {} failed", failed.len());
        Ok(failed)
    }

    /// Bulk write-if-absent (optional optimization).
    ///
    /// Returns the keys that were not written. Default implementation issues
    /// one `add_value()` per entry concurrently, with the same error handling
    /// as [`set_values`](CacheBackend::set_values).
    ///
    /// # Errors
    /// Default implementation never returns `Err`.
    async fn add_values(
        &self,
        items: HashMap<String, String>,
        ttl: Option<Duration>,
    ) -> Result<Vec<String>> {
        let writes = items.into_iter().map(|(key, value)| async move {
            let outcome = self.add_value(&key, value, ttl).await;
            (key, outcome)
        });

        let failed = collect_failures("ADD", join_all(writes).await);
        debug!("Default ADD_VALUES -> {} failed", failed.len());
        Ok(failed)
    }
}

/// Keys whose write returned `false` or an error.
fn collect_failures(op: &str, outcomes: Vec<(String, Result<bool>)>) -> Vec<String> {
    outcomes
        .into_iter()
        .filter_map(|(key, outcome)| match outcome {
            Ok(true) => None,
            Ok(false) => Some(key),
            Err(e) => {
                warn!("⚠ {} failed for {}: {}", op, key, e);
                Some(key)
            }
        })
        .collect()
}

/// Convert a lifetime in seconds to a backend TTL. `0` means no expiry.
pub fn ttl_from_secs(duration: u64) -> Option<Duration> {
    if duration == 0 {
        None
    } else {
        Some(Duration::from_secs(duration))
    }
}
