//! Error types for store operations

use thiserror::Error;
use wayfarer_domain::traits::StorageKey;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persistence backend failed to read or write
    ///
    /// In-memory state is kept when this is returned from a mutation; only
    /// durability is in doubt.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Stored data could not be decoded
    #[error("Corrupt data under '{key}': {source}")]
    Corrupt {
        /// Key whose value failed to decode
        key: StorageKey,
        /// Decoder error
        source: serde_json::Error,
    },

    /// An aggregate could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
