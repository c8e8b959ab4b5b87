//! # cache-facade
//!
//! A backend-agnostic cache front-end for Rust.
//!
//! ## Features
//!
//! - **Any Key Shape:** Strings, numbers, tuples, structs and maps are normalized into
//!   prefixed storage keys; long or structured keys become fixed-width hashes
//! - **Optional Serialization:** Values are stored as JSON, or passed through as plain text
//! - **Explicit Absence:** Misses are `None`, so stored `false`, `0` and `""` stay distinguishable
//! - **Batch Operations:** `multi_get`, `multi_set` and `multi_add` with default fallbacks
//!   built from single-key primitives, overridable by backends with native batching
//! - **Backend Agnostic:** Implement five primitives of [`CacheBackend`] to plug in any store
//!
//! ## Quick Start
//!
//! ```ignore
//! use cache_facade::{Cache, CacheConfig, backend::InMemoryBackend};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let cache = Cache::from_config(
//!     InMemoryBackend::new(),
//!     CacheConfig::default().with_key_prefix("app:"),
//! );
//!
//! // Short string keys are stored as-is: "app:user:42"
//! cache.set("user:42", &User { id: 42, name: "Alice".into() }, 3600).await?;
//! let user: Option<User> = cache.get("user:42").await?;
//!
//! // Structured keys are hashed: "app:<32 hex chars>"
//! cache.set(&("report", 2024, "Q1"), &vec![1, 2, 3], 0).await?;
//!
//! // Write-if-absent
//! assert!(!cache.add("user:42", &"someone else", 0).await?);
//!
//! // Batch writes report failed *storage* keys
//! let failed = cache.multi_add([("a", 1), ("b", 2)], 0).await?;
//! ```
//!
//! ## Sharing Across Tasks
//!
//! Use [`CacheService`], a cheap-to-clone `Arc` handle:
//!
//! ```ignore
//! let cache = CacheService::new(InMemoryBackend::new());
//! let cache_clone = cache.clone();  // Cheap - just Arc increment
//! tokio::spawn(async move { cache_clone.delete("user:42").await });
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod observability;
pub mod serialization;
pub mod service;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use key::CacheKeyBuilder;
pub use service::CacheService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
