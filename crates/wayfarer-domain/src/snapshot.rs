//! Export snapshot - the document exchanged with import/export files

use crate::place::PlaceRecord;
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema tag written into every export and checked on import
pub const EXPORT_VERSION: &str = "1.0";

/// Read-only deep copy of the store, ready for serialization
///
/// ```json
/// {
///   "todoPlaces": [],
///   "visitedPlaces": [],
///   "settings": { "showVisited": true, "autoPrompt": true, "promptDelayMs": 2000 },
///   "exportedAt": "2026-10-19T08:00:00Z",
///   "version": "1.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    /// Places still to visit, in insertion order
    pub todo_places: Vec<PlaceRecord>,

    /// Visited places, in the order they were visited
    pub visited_places: Vec<PlaceRecord>,

    /// Settings at export time
    pub settings: Settings,

    /// When the snapshot was taken
    pub exported_at: DateTime<Utc>,

    /// Schema tag, always [`EXPORT_VERSION`] when produced here
    pub version: String,
}

impl ExportSnapshot {
    /// Build a snapshot stamped with the current schema version
    pub fn new(
        todo_places: Vec<PlaceRecord>,
        visited_places: Vec<PlaceRecord>,
        settings: Settings,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            todo_places,
            visited_places,
            settings,
            exported_at,
            version: EXPORT_VERSION.to_string(),
        }
    }
}
