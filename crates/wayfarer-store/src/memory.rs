//! In-process persistence backend

use std::collections::HashMap;
use std::convert::Infallible;
use wayfarer_domain::traits::{PersistenceBackend, StorageKey};

/// Backend that keeps values in a map for the life of the process
///
/// Useful for tests and for sessions that should leave nothing behind.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<StorageKey, String>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: StorageKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistenceBackend for MemoryBackend {
    type Error = Infallible;

    fn load(&self, key: StorageKey) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(&key).cloned())
    }

    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), Self::Error> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.entries.clear();
        Ok(())
    }
}
