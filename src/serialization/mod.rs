//! Value encoding at the backend boundary.
//!
//! Backends only ever see text. This module converts typed values to and from
//! that text in one of two modes, selected per cache by the serialization flag:
//!
//! - **Enabled** (default): values are stored as JSON text and decoded back into
//!   the requested type on read.
//! - **Disabled**: values pass through as opaque text. Strings are stored
//!   verbatim, booleans and numbers as their literal spelling. Structured values
//!   are rejected because there is no text to pass through.
//!
//! # Example
//!
//! ```rust
//! use cache_facade::serialization::{serialize_for_cache, deserialize_from_cache};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # fn main() -> cache_facade::Result<()> {
//! let user = User { id: 1, name: "Alice".to_string() };
//!
//! let text = serialize_for_cache(&user)?;
//! assert_eq!(text, r#"{"id":1,"name":"Alice"}"#);
//!
//! let decoded: User = deserialize_from_cache(&text)?;
//! assert_eq!(user, decoded);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Encode a value for the backend according to the serialization flag.
pub fn encode_value<T: Serialize + ?Sized>(value: &T, serialization: bool) -> Result<String> {
    if serialization {
        serialize_for_cache(value)
    } else {
        to_raw_text(value)
    }
}

/// Decode backend text according to the serialization flag.
pub fn decode_value<T: DeserializeOwned>(text: &str, serialization: bool) -> Result<T> {
    if serialization {
        deserialize_from_cache(text)
    } else {
        from_raw_text(text)
    }
}

/// Serialize a value to JSON text for cache storage.
///
/// Non-finite floats (`NaN`, `±inf`) have no JSON spelling and are written as
/// `null`. They read back as `None` through an `Option` target, and fail with
/// `Error::DeserializationError` through a bare float. Raw text mode rejects
/// them at encode time instead.
///
/// # Errors
///
/// Returns `Error::SerializationError` if the value's `Serialize`
/// implementation fails.
pub fn serialize_for_cache<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        log::error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from JSON cache text.
///
/// # Errors
///
/// Returns `Error::DeserializationError` if the text is not valid JSON or does
/// not match the requested type.
pub fn deserialize_from_cache<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        log::error!("Cache deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })
}

/// Render a scalar value as opaque text.
///
/// # Errors
///
/// Returns `Error::SerializationError` for values that are not a string,
/// boolean or number.
pub fn to_raw_text<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let rendered = serde_json::to_value(value).map_err(|e| {
        log::error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })?;

    match rendered {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::SerializationError(format!(
            "Only strings, booleans and numbers can be cached with serialization disabled, got {}",
            json_kind(&other)
        ))),
    }
}

/// Read opaque text back into a value.
///
/// The text is handed to the target type as a string first, so `String`
/// targets always receive it verbatim. Other targets (booleans, numbers) parse
/// it as a literal.
///
/// # Errors
///
/// Returns `Error::DeserializationError` if neither reading succeeds.
pub fn from_raw_text<T: DeserializeOwned>(text: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_value(Value::String(text.to_string())) {
        return Ok(value);
    }

    serde_json::from_str(text).map_err(|e| {
        log::error!("Raw cache text does not match requested type: {}", e);
        Error::DeserializationError(format!("Raw cache text {:?}: {}", text, e))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct TestData {
        id: u64,
        name: String,
        active: bool,
    }

    #[test]
    fn test_roundtrip() {
        let data = TestData {
            id: 123,
            name: "test".to_string(),
            active: true,
        };

        let text = serialize_for_cache(&data).unwrap();
        let decoded: TestData = deserialize_from_cache(&text).unwrap();

        assert_eq!(data, decoded);
    }

    #[test]
    fn test_json_text_format() {
        let text = serialize_for_cache(&json!({"a": 1})).unwrap();
        assert_eq!(text, r#"{"a":1}"#);
    }

    #[test]
    fn test_falsy_values_survive() {
        assert_eq!(serialize_for_cache(&false).unwrap(), "false");
        assert!(!deserialize_from_cache::<bool>("false").unwrap());
        assert_eq!(deserialize_from_cache::<i64>("0").unwrap(), 0);
        assert_eq!(deserialize_from_cache::<String>(r#""""#).unwrap(), "");
    }

    #[test]
    fn test_malformed_text_rejected() {
        let result: Result<TestData> = deserialize_from_cache("{\"id\": 1");
        match result.unwrap_err() {
            Error::DeserializationError(_) => {}
            e => panic!("Expected DeserializationError, got {:?}", e),
        }
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result: Result<TestData> = deserialize_from_cache("[1, 2, 3]");
        assert!(matches!(result, Err(Error::DeserializationError(_))));
    }

    #[test]
    fn test_raw_string_verbatim() {
        assert_eq!(to_raw_text("raw").unwrap(), "raw");
        assert_eq!(to_raw_text("").unwrap(), "");
        assert_eq!(from_raw_text::<String>("raw").unwrap(), "raw");
        assert_eq!(from_raw_text::<String>("").unwrap(), "");

        // Text that happens to look like JSON is still just text.
        assert_eq!(from_raw_text::<String>("true").unwrap(), "true");
        assert_eq!(from_raw_text::<String>(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_raw_scalars() {
        assert_eq!(to_raw_text(&false).unwrap(), "false");
        assert_eq!(to_raw_text(&42).unwrap(), "42");
        assert!(!from_raw_text::<bool>("false").unwrap());
        assert_eq!(from_raw_text::<u32>("42").unwrap(), 42);
    }

    #[test]
    fn test_raw_rejects_structures() {
        let data = TestData {
            id: 1,
            name: "x".to_string(),
            active: true,
        };
        assert!(matches!(
            to_raw_text(&data),
            Err(Error::SerializationError(_))
        ));
        assert!(matches!(
            to_raw_text(&Option::<String>::None),
            Err(Error::SerializationError(_))
        ));
    }

    #[test]
    fn test_non_finite_floats() {
        let text = serialize_for_cache(&f64::NAN).unwrap();
        assert_eq!(text, "null");
        assert_eq!(deserialize_from_cache::<Option<f64>>(&text).unwrap(), None);
        assert!(matches!(
            deserialize_from_cache::<f64>(&text),
            Err(Error::DeserializationError(_))
        ));

        assert!(matches!(
            to_raw_text(&f64::INFINITY),
            Err(Error::SerializationError(_))
        ));
    }

    #[test]
    fn test_raw_mismatch_rejected() {
        let result = from_raw_text::<u32>("not a number");
        assert!(matches!(result, Err(Error::DeserializationError(_))));
    }

    #[test]
    fn test_encode_decode_respect_flag() {
        assert_eq!(encode_value("raw", true).unwrap(), r#""raw""#);
        assert_eq!(encode_value("raw", false).unwrap(), "raw");
        assert_eq!(decode_value::<String>(r#""raw""#, true).unwrap(), "raw");
        assert_eq!(decode_value::<String>(r#""raw""#, false).unwrap(), r#""raw""#);
    }

    #[test]
    fn test_deterministic_serialization() {
        let data = TestData {
            id: 123,
            name: "test".to_string(),
            active: true,
        };

        assert_eq!(
            serialize_for_cache(&data).unwrap(),
            serialize_for_cache(&data.clone()).unwrap()
        );
    }
}
