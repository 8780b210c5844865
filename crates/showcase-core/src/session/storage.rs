//! Durable local key/value storage trait.
//!
//! Defines the interface the session uses to survive process restarts,
//! decoupling the session logic from the storage mechanism (JSON file,
//! platform keychain, in-memory for tests).

use crate::error::Result;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Synchronous string key/value storage.
///
/// Reads and writes are synchronous so logout and expiry can clear the
/// persisted session without awaiting.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Entry found
    /// - `Ok(None)`: No entry for `key`
    /// - `Err(_)`: Storage could not be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the entry under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store with no durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries.remove(key);
        Ok(())
    }
}
