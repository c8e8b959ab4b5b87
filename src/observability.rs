//! Observability hooks for cache operations.
//!
//! Implement [`CacheMetrics`] to feed cache behavior into your monitoring
//! system:
//!
//! ```ignore
//! use cache_facade::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("cache_hits").inc();
//!         // histogram!("cache_latency").record(duration);
//!     }
//!     // ... implement other methods
//! }
//!
//! let cache = Cache::new(backend).with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Every hook has a default that logs through the `log` crate, so an
//! implementation only needs to override what it exports. [`Cache`] uses
//! [`NoOpMetrics`] unless told otherwise.
//!
//! Hooks receive the storage key (prefixed and possibly hashed), never the
//! caller's original key. Single-key operations report one event each:
//!
//! | Operation | Event |
//! |-----------|-------|
//! | `get` | `record_hit` / `record_miss` |
//! | `exists` | `record_hit` / `record_miss` |
//! | `set`, `add` | `record_set` (whether or not the backend accepted it) |
//! | `delete` | `record_delete` |
//! | any of the above failing | `record_error` |
//!
//! [`Cache`]: crate::Cache

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache write (`set` or `add`).
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache delete operation.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Metrics implementation that keeps only the default logging behavior.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl CacheMetrics for LogMetrics {}
