//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field has a default so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_NAVIGATION_DELAY_MS: u64 = 3000;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Origin of the remote service, without the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Delay before navigating after login, signup or delete
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,
}

impl UiConfig {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            navigation_delay_ms: default_navigation_delay_ms(),
        }
    }
}

fn default_navigation_delay_ms() -> u64 {
    DEFAULT_NAVIGATION_DELAY_MS
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("[api]\nbase_url = \"https://showcase.example\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://showcase.example");
        assert_eq!(config.ui.navigation_delay(), Duration::from_secs(3));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
