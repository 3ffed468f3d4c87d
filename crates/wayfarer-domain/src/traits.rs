//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the place logic and the
//! environment it runs in. Implementations live in other crates.

use crate::PlaceObservation;

/// Keys the place store persists under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The todo collection
    TodoPlaces,

    /// The visited collection
    VisitedPlaces,

    /// User settings
    Settings,
}

impl StorageKey {
    /// Every key, in persistence order
    pub const ALL: [StorageKey; 3] = [
        StorageKey::TodoPlaces,
        StorageKey::VisitedPlaces,
        StorageKey::Settings,
    ];

    /// Get the key name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::TodoPlaces => "todoPlaces",
            StorageKey::VisitedPlaces => "visitedPlaces",
            StorageKey::Settings => "settings",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for durable key/value storage of serialized aggregates
///
/// Implemented by the infrastructure layer (wayfarer-store). Values are JSON
/// documents; the backend does not interpret them.
pub trait PersistenceBackend {
    /// Error type for backend operations
    type Error: std::error::Error;

    /// Load the value stored under `key`, or `None` if nothing is stored
    fn load(&self, key: StorageKey) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), Self::Error>;

    /// Store several values together
    ///
    /// Backends that can write atomically should override this so a failure
    /// never leaves one aggregate updated and another stale.
    fn save_all(&mut self, entries: &[(StorageKey, String)]) -> Result<(), Self::Error> {
        for (key, value) in entries {
            self.save(*key, value)?;
        }
        Ok(())
    }

    /// Erase every key this backend owns
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Trait for the page-scraping collaborator
///
/// Returns the place the user is currently looking at, if the page shows one.
pub trait PlaceSource {
    /// Extract the current place observation
    fn current_place(&self) -> Option<PlaceObservation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_names() {
        let names: Vec<&str> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["todoPlaces", "visitedPlaces", "settings"]);
    }
}
