//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `origin` is not an http(s) URL
    /// - `cache_prefix` or `cache_version` is empty
    /// - `shell_manifest` is empty, has a relative entry, or lists an API path
    /// - `api_prefix` does not start with `/`
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `holdings_label` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.origin.starts_with("http://") || self.origin.starts_with("https://")) {
            return Err(invalid("origin", "must be an http:// or https:// URL"));
        }

        if self.cache_prefix.trim().is_empty() {
            return Err(invalid("cache_prefix", "must not be empty"));
        }
        if self.cache_version.trim().is_empty() {
            return Err(invalid("cache_version", "must not be empty"));
        }

        if !self.api_prefix.starts_with('/') {
            return Err(invalid("api_prefix", "must start with '/'"));
        }

        if self.shell_manifest.is_empty() {
            return Err(invalid("shell_manifest", "must list at least one resource"));
        }
        for path in &self.shell_manifest {
            if !path.starts_with('/') {
                return Err(invalid("shell_manifest", format!("'{path}' must be an absolute path")));
            }
            if path.starts_with(&self.api_prefix) {
                return Err(invalid("shell_manifest", format!("'{path}' is an API path and is never cached")));
            }
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.holdings_label.trim().is_empty() {
            return Err(invalid("holdings_label", "must not be empty"));
        }

        if self.cache_version.contains(char::is_whitespace) {
            tracing::warn!(
                cache_version = %self.cache_version,
                "cache_version contains whitespace; generation names will too"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &AppConfig) -> Option<String> {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_origin_scheme() {
        let config = AppConfig { origin: "ftp://example.com".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("origin"));
    }

    #[test]
    fn test_validate_empty_version() {
        let config = AppConfig { cache_version: " ".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("cache_version"));
    }

    #[test]
    fn test_validate_empty_manifest() {
        let config = AppConfig { shell_manifest: Vec::new(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("shell_manifest"));
    }

    #[test]
    fn test_validate_relative_manifest_entry() {
        let config = AppConfig { shell_manifest: vec!["static/style.css".into()], ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("shell_manifest"));
    }

    #[test]
    fn test_validate_manifest_entry_under_api_prefix() {
        let config = AppConfig { shell_manifest: vec!["/".into(), "/api/daily_chart".into()], ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("shell_manifest"));
    }

    #[test]
    fn test_validate_api_prefix_must_be_absolute() {
        let config = AppConfig { api_prefix: "api/".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("api_prefix"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("timeout_ms"));

        let config = AppConfig { timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_holdings_label() {
        let config = AppConfig { holdings_label: String::new(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("holdings_label"));
    }
}
