//! Unified path management for showcase configuration and state files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for showcase_core::ShowcaseError {
    fn from(e: PathError) -> Self {
        showcase_core::ShowcaseError::config(e.to_string())
    }
}

/// Unified path management for showcase.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/showcase/          # Config directory (platform default)
/// ├── config.toml              # Application configuration
/// └── session.json             # Persisted session entries (mode 600)
/// ```
///
/// With a base path, the same layout is placed directly under it. Tests and
/// the `--config-dir` flag use this to stay out of the user's home.
#[derive(Debug, Clone, Default)]
pub struct ShowcasePaths {
    base: Option<PathBuf>,
}

impl ShowcasePaths {
    /// Creates a resolver; `None` uses the platform config directory.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Creates a resolver rooted at `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Returns the showcase configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/showcase/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("showcase"))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted session file.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token; it is written with mode 600 on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        // Platform dependent; only assert the suffix when a home exists
        if let Ok(config_dir) = ShowcasePaths::default().config_dir() {
            assert!(config_dir.ends_with("showcase"));
        }
    }

    #[test]
    fn test_base_path_layout() {
        let paths = ShowcasePaths::with_base("/tmp/showcase-test");
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/showcase-test/config.toml")
        );
        assert_eq!(
            paths.session_file().unwrap(),
            PathBuf::from("/tmp/showcase-test/session.json")
        );
    }
}
