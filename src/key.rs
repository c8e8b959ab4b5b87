//! Cache key normalization.
//!
//! Turns caller-facing keys of any serializable shape into prefixed storage
//! keys. Short string keys are stored as-is; anything else is reduced to a
//! fixed-width content hash:
//!
//! ```text
//! "user:42"                -> "{prefix}user:42"
//! "<string over 32 bytes>" -> "{prefix}{hex(sha256(string)[..16])}"
//! {"id": 1, "tag": "x"}    -> "{prefix}{hex(sha256(json)[..16])}"
//! ```

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Longest string key (in bytes) stored without hashing.
pub const MAX_RAW_KEY_LEN: usize = 32;

/// Number of digest bytes kept for hashed keys (128 bits, 32 hex chars).
const HASH_BYTES: usize = 16;

/// Builder for storage keys within one key prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheKeyBuilder {
    prefix: String,
}

impl CacheKeyBuilder {
    /// Create a builder scoping every key to `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        CacheKeyBuilder {
            prefix: prefix.into(),
        }
    }

    /// The configured key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the storage key for a cache key.
    ///
    /// Strings of at most [`MAX_RAW_KEY_LEN`] bytes are appended to the prefix
    /// unchanged. Longer strings are hashed directly; every other value is
    /// rendered as compact JSON first. JSON objects keep their members sorted
    /// by name, so two maps with the same entries always agree.
    ///
    /// Keys are compared by their JSON rendering, not their Rust type. `Some(k)`
    /// shares a storage key with `k`, and `None`, `()` and non-finite floats all
    /// render as `null` and share one key. Wrap such keys in a tuple or struct
    /// with a distinguishing tag when they must stay apart.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if the key cannot be rendered
    /// (for example a map whose keys are not strings).
    pub fn build<K: Serialize + ?Sized>(&self, key: &K) -> Result<String> {
        let rendered = serde_json::to_value(key).map_err(|e| {
            error!("Cache key rendering failed: {}", e);
            Error::SerializationError(format!("Cache key cannot be rendered: {}", e))
        })?;

        let normalized = match rendered {
            Value::String(s) if s.len() <= MAX_RAW_KEY_LEN => s,
            Value::String(s) => Self::hash_key(&s),
            other => Self::hash_key(&other.to_string()),
        };

        Ok(format!("{}{}", self.prefix, normalized))
    }

    /// Hash canonical key text into a 32-character lowercase hex digest.
    pub fn hash_key(text: &str) -> String {
        let digest = Sha256::digest(text.as_bytes());
        hex::encode(&digest[..HASH_BYTES])
    }
}
