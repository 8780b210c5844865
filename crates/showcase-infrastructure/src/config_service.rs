//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the application
//! configuration from the configuration file (~/.config/showcase/config.toml).

use crate::paths::ShowcasePaths;
use showcase_core::config::AppConfig;
use showcase_core::error::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "SHOWCASE_BASE_URL";

/// Configuration service that loads and caches the application configuration.
///
/// A missing file is created with defaults on first load. Environment
/// overrides are applied on top of the file content and never written back.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a service for the config file resolved by `paths`.
    pub fn new(paths: &ShowcasePaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service for an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the default file cannot be created.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|p| p.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_or_create()?;
        apply_env_overrides(&mut loaded, |name| std::env::var(name).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|p| p.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    fn load_or_create(&self) -> Result<AppConfig> {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            let config: AppConfig = toml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", self.path.display());
            return Ok(config);
        }

        let default_config = AppConfig::default();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(&default_config)?)?;
        tracing::info!("Created default config at {}", self.path.display());

        Ok(default_config)
    }
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
        config.api.base_url = base_url;
    }
}
