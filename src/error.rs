//! Error types for the cache facade.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the cache facade.
///
/// Absence of a value is never an error: reads return `Ok(None)`, and a write
/// the backend refused (e.g. `add` on an existing key) returns `Ok(false)`.
/// The variants below cover the remaining failure modes.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a key or value to cache text.
    ///
    /// Common causes:
    /// - The value's `Serialize` implementation failed
    /// - A map key is not a string (cannot be rendered as JSON)
    /// - A structured value was written with serialization disabled
    SerializationError(String),

    /// Deserialization failed when converting cache text back to a value.
    ///
    /// This indicates the stored text does not match the requested type, or
    /// the entry was written by something other than this crate.
    ///
    /// **Recovery:** Delete the cache entry and recompute it.
    DeserializationError(String),

    /// Backend storage error.
    ///
    /// Raised by backend primitives when the store cannot complete a call
    /// (connection lost, protocol error, storage full). Single-key operations
    /// propagate it unchanged; default batch writes record the affected key
    /// as failed instead.
    BackendError(String),

    /// Configuration error while building a cache.
    ///
    /// Common causes:
    /// - Unparseable `CACHE_SERIALIZATION` environment variable
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

/// A bare `serde_json::Error` is treated as a failed read of cache text.
///
/// Encoding paths map their errors to `SerializationError` explicitly, since
/// serde_json reports both directions' type mismatches as data errors.
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else {
            Error::DeserializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::BackendError("connection reset".to_string());
        assert_eq!(err.to_string(), "Backend error: connection reset");
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "test error".into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn test_error_from_json_syntax() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        assert!(json_err.is_eof());
        let err: Error = json_err.into();
        assert!(matches!(err, Error::DeserializationError(_)));

        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(json_err.is_syntax());
        let err: Error = json_err.into();
        assert!(matches!(err, Error::DeserializationError(_)));
    }

    #[test]
    fn test_error_from_json_type_mismatch() {
        // Well-formed JSON of the wrong shape is a data error, still a failed read.
        let json_err = serde_json::from_str::<u32>("{\"id\": 1}").unwrap_err();
        assert!(json_err.is_data());
        let err: Error = json_err.into();
        assert!(matches!(err, Error::DeserializationError(_)));
    }
}
