//! Cache configuration.

use crate::error::{Error, Result};

/// Environment variable holding the key prefix.
pub const ENV_KEY_PREFIX: &str = "CACHE_KEY_PREFIX";

/// Environment variable toggling value serialization.
pub const ENV_SERIALIZATION: &str = "CACHE_SERIALIZATION";

/// Configuration for a [`Cache`](crate::Cache).
///
/// Both fields are fixed once the cache is built.
///
/// # Example
///
/// ```
/// use cache_facade::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_key_prefix("app:")
///     .with_serialization(false);
///
/// assert_eq!(config.key_prefix, "app:");
/// assert!(!config.serialization);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Prepended to every storage key. Lets several logical caches share one
    /// physical store. Does not scope `flush`.
    pub key_prefix: String,

    /// Store values as JSON (`true`) or pass them through as plain text.
    pub serialization: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            key_prefix: String::new(),
            serialization: true,
        }
    }
}

impl CacheConfig {
    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Enable or disable value serialization.
    pub fn with_serialization(mut self, enabled: bool) -> Self {
        self.serialization = enabled;
        self
    }

    /// Build configuration from the environment.
    ///
    /// - `CACHE_KEY_PREFIX`: key prefix (default empty)
    /// - `CACHE_SERIALIZATION`: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`
    ///   (default `true`)
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if `CACHE_SERIALIZATION` is set to anything
    /// else.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CacheConfig::default();

        if let Some(prefix) = lookup(ENV_KEY_PREFIX) {
            config.key_prefix = prefix;
        }

        if let Some(raw) = lookup(ENV_SERIALIZATION) {
            config.serialization = parse_flag(&raw).ok_or_else(|| {
                Error::ConfigError(format!(
                    "{} must be a boolean flag, got {:?}",
                    ENV_SERIALIZATION, raw
                ))
            })?;
        }

        info!(
            "✓ Cache config loaded (prefix: {:?}, serialization: {})",
            config.key_prefix, config.serialization
        );

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.key_prefix, "");
        assert!(config.serialization);
    }

    #[test]
    fn test_config_from_empty_environment() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_from_environment() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            (ENV_KEY_PREFIX, "tenant_a:"),
            (ENV_SERIALIZATION, " OFF "),
        ]))
        .unwrap();

        assert_eq!(config.key_prefix, "tenant_a:");
        assert!(!config.serialization);
    }

    #[test]
    fn test_config_rejects_bad_flag() {
        let result = CacheConfig::from_lookup(lookup_from(&[(ENV_SERIALIZATION, "maybe")]));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
