//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (KAKEI_*)
//! 2. TOML config file (if KAKEI_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::search::SummaryLocale;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (KAKEI_*)
/// 2. TOML config file (if KAKEI_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via KAKEI_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the expense app server. Relative request paths resolve
    /// against it and only same-origin requests are ever cached.
    ///
    /// Set via KAKEI_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Name prefix shared by every cache generation.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Version token of the current generation. Bump it whenever
    /// `shell_manifest` changes so the next activate evicts old entries.
    ///
    /// Set via KAKEI_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// App-shell resources fetched and stored at install time.
    #[serde(default = "default_shell_manifest")]
    pub shell_manifest: Vec<String>,

    /// Path prefix of requests that always go to the network.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Header label that marks a table as a holdings table.
    #[serde(default = "default_holdings_label")]
    pub holdings_label: String,

    /// Language of the aggregate summary text.
    #[serde(default)]
    pub summary_locale: SummaryLocale,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via KAKEI_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./kakei-shell-cache.sqlite")
}

fn default_origin() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_cache_prefix() -> String {
    "kakei-shell".into()
}

fn default_cache_version() -> String {
    "v1".into()
}

fn default_shell_manifest() -> Vec<String> {
    [
        "/",
        "/static/style.css",
        "/static/script.js",
        "/static/search.js",
        "/manifest.json",
        "/static/icon-192.png",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_holdings_label() -> String {
    "銘柄".into()
}

fn default_user_agent() -> String {
    "kakei-shell/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            origin: default_origin(),
            cache_prefix: default_cache_prefix(),
            cache_version: default_cache_version(),
            shell_manifest: default_shell_manifest(),
            api_prefix: default_api_prefix(),
            holdings_label: default_holdings_label(),
            summary_locale: SummaryLocale::default(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name of the cache generation this build owns, e.g. `kakei-shell-v1`.
    pub fn generation_name(&self) -> String {
        format!("{}-{}", self.cache_prefix, self.cache_version)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `KAKEI_`
    /// 2. TOML file from `KAKEI_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("KAKEI_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("KAKEI_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./kakei-shell-cache.sqlite"));
        assert_eq!(config.origin, "http://127.0.0.1:8000");
        assert_eq!(config.api_prefix, "/api/");
        assert_eq!(config.holdings_label, "銘柄");
        assert_eq!(config.summary_locale, SummaryLocale::Ja);
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.shell_manifest.iter().any(|p| p == "/"));
        assert!(config.shell_manifest.iter().any(|p| p == "/manifest.json"));
    }

    #[test]
    fn test_generation_name_embeds_version() {
        let config = AppConfig { cache_version: "v7".into(), ..Default::default() };
        assert_eq!(config.generation_name(), "kakei-shell-v7");
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let toml = r#"
            cache_version = "v2"
            summary_locale = "en"
            shell_manifest = ["/", "/static/app.css"]
        "#;
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();

        assert_eq!(config.cache_version, "v2");
        assert_eq!(config.summary_locale, SummaryLocale::En);
        assert_eq!(config.shell_manifest, vec!["/".to_string(), "/static/app.css".to_string()]);
        assert_eq!(config.api_prefix, "/api/");
    }
}
