//! Shareable cache handle for multi-task applications.
//!
//! Provides a convenient wrapper around [`Cache`] with `Arc` for easy sharing.

use crate::backend::CacheBackend;
use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::observability::CacheMetrics;
use std::ops::Deref;
use std::sync::Arc;

/// Cloneable, thread-safe cache handle.
///
/// Wraps [`Cache`] in `Arc` so it can be handed to many tasks without an
/// external `Arc<Mutex<>>`. `Cache` only needs `&self` and its configuration
/// never changes after construction, so no lock is involved. All cache
/// operations are available directly through `Deref`.
///
/// # Example
///
/// ```ignore
/// use cache_facade::{CacheService, CacheConfig, backend::InMemoryBackend};
///
/// let cache = CacheService::from_config(
///     InMemoryBackend::new(),
///     CacheConfig::default().with_key_prefix("sessions:"),
/// );
///
/// // In your web service struct
/// pub struct SessionStore {
///     cache: CacheService<InMemoryBackend>,
/// }
///
/// impl SessionStore {
///     pub async fn load(&self, id: &str) -> cache_facade::Result<Option<Session>> {
///         self.cache.get(id).await
///     }
/// }
/// ```
#[derive(Clone)]
pub struct CacheService<B: CacheBackend> {
    cache: Arc<Cache<B>>,
}

impl<B: CacheBackend> CacheService<B> {
    /// Create a new cache service with the given backend.
    pub fn new(backend: B) -> Self {
        CacheService {
            cache: Arc::new(Cache::new(backend)),
        }
    }

    /// Create a new cache service from explicit configuration.
    pub fn from_config(backend: B, config: CacheConfig) -> Self {
        CacheService {
            cache: Arc::new(Cache::from_config(backend, config)),
        }
    }

    /// Create a new cache service with custom metrics.
    pub fn with_metrics(backend: B, config: CacheConfig, metrics: Box<dyn CacheMetrics>) -> Self {
        CacheService {
            cache: Arc::new(Cache::from_config(backend, config).with_metrics(metrics)),
        }
    }

    /// Get a reference to the underlying cache.
    pub fn cache(&self) -> &Cache<B> {
        &self.cache
    }
}

impl<B: CacheBackend> From<Cache<B>> for CacheService<B> {
    fn from(cache: Cache<B>) -> Self {
        CacheService {
            cache: Arc::new(cache),
        }
    }
}

impl<B: CacheBackend> Deref for CacheService<B> {
    type Target = Cache<B>;

    fn deref(&self) -> &Self::Target {
        &self.cache
    }
}
