//! Error types for service operations

use crate::ImportReport;
use thiserror::Error;
use wayfarer_store::StoreError;

/// Errors surfaced at the command boundary
///
/// None of these are fatal; each becomes `{ "success": false, "error": ... }`.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request could not be parsed or names an unknown action
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Import file rejected
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// A successful response carried an error or unexpected data
    #[error("Request failed: {0}")]
    Remote(String),

    /// The store actor has shut down
    #[error("Store is not running")]
    ActorStopped,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons an import document is rejected before anything is applied
#[derive(Error, Debug)]
pub enum ImportError {
    /// Required top-level keys are missing or an entry is malformed
    #[error("Malformed import file: {0}")]
    Malformed(String),

    /// The document was written by an incompatible version
    #[error("Unsupported export version '{0}'")]
    UnsupportedVersion(String),

    /// Saving failed partway; `report` counts the entries that were saved
    #[error("Import interrupted ({}): {source}", .report.summary())]
    Interrupted {
        /// Entries applied before the failure
        report: ImportReport,
        /// The persistence failure
        source: StoreError,
    },
}
