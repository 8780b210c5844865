//! File-backed key/value store for the persisted session.

use super::atomic_json::AtomicJsonFile;
use crate::paths::ShowcasePaths;
use showcase_core::error::Result;
use showcase_core::session::KeyValueStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

type Entries = BTreeMap<String, String>;

/// Flat JSON object of string entries, one file per store.
///
/// Responsibilities:
/// - Persist individual entries across process restarts
/// - Write every change atomically with mode 600
///
/// Does NOT:
/// - Cache entries; every read goes to disk so separate processes see each
///   other's logins and logouts
/// - Encrypt anything (plaintext JSON storage)
pub struct JsonFileStore {
    file: AtomicJsonFile<Entries>,
}

impl JsonFileStore {
    /// Creates a store at the default session path
    /// (`~/.config/showcase/session.json`).
    pub fn new(paths: &ShowcasePaths) -> Result<Self> {
        Ok(Self::with_path(paths.session_file()?))
    }

    /// Creates a store backed by a custom file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.file.load()?.unwrap_or_default();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file.update(Entries::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(Entries::new(), |entries| {
            entries.remove(key);
        })?;
        Ok(())
    }
}
