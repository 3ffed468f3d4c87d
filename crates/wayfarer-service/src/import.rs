//! Import of export documents
//!
//! The document is parsed and validated in full before anything touches the
//! store, so a malformed file is rejected with no partial apply. Application
//! routes every todo entry through `add_todo_place`, which keeps duplicate
//! suppression in force; re-importing an export is a no-op.

use crate::ImportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use wayfarer_domain::traits::PersistenceBackend;
use wayfarer_domain::{PlaceObservation, PlaceRecord, SettingsPatch, EXPORT_VERSION};
use wayfarer_store::{PlaceStore, StoreError};

/// A validated import document
#[derive(Debug, Clone, Default)]
pub struct ImportDocument {
    /// Todo entries; only the observed fields are used
    pub todo_places: Vec<PlaceObservation>,

    /// Visited entries, kept with their ids and timestamps
    pub visited_places: Vec<PlaceRecord>,

    /// Settings to merge, if the file carried any
    pub settings: Option<SettingsPatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    todo_places: Option<Vec<PlaceObservation>>,
    #[serde(default)]
    visited_places: Option<Vec<PlaceRecord>>,
    #[serde(default)]
    settings: Option<SettingsPatch>,
    #[serde(default)]
    version: Option<String>,
}

impl ImportDocument {
    /// Validate a parsed JSON document
    ///
    /// At least one of `todoPlaces` / `visitedPlaces` must be present. A
    /// `version` other than the current one is refused; a missing version is
    /// accepted.
    pub fn from_value(value: Value) -> Result<Self, ImportError> {
        if !value.is_object() {
            return Err(ImportError::Malformed("expected a JSON object".to_string()));
        }

        let raw: RawDocument = serde_json::from_value(value)
            .map_err(|e| ImportError::Malformed(e.to_string()))?;

        if raw.todo_places.is_none() && raw.visited_places.is_none() {
            return Err(ImportError::Malformed(
                "neither todoPlaces nor visitedPlaces is present".to_string(),
            ));
        }

        if let Some(version) = raw.version {
            if version != EXPORT_VERSION {
                return Err(ImportError::UnsupportedVersion(version));
            }
        }

        Ok(Self {
            todo_places: raw.todo_places.unwrap_or_default(),
            visited_places: raw.visited_places.unwrap_or_default(),
            settings: raw.settings,
        })
    }

    /// Parse and validate document text
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }
}

/// What an import changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Todo entries added
    pub todo_added: usize,

    /// Todo entries already known
    pub todo_skipped: usize,

    /// Visited entries added or applied to a todo place
    pub visited_added: usize,

    /// Visited entries already known
    pub visited_skipped: usize,

    /// Whether settings were merged
    pub settings_applied: bool,
}

impl ImportReport {
    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "Imported {} todo ({} skipped), {} visited ({} skipped){}",
            self.todo_added,
            self.todo_skipped,
            self.visited_added,
            self.visited_skipped,
            if self.settings_applied { ", settings updated" } else { "" }
        )
    }
}

/// Apply a validated document to `store`
///
/// Every entry is saved as it is applied. If saving fails the entries already
/// applied stay in place, and the error carries their counts.
pub fn apply_import<B: PersistenceBackend>(
    store: &mut PlaceStore<B>,
    document: ImportDocument,
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();

    let interrupted = |report: ImportReport, source: StoreError| {
        warn!(error = %source, "Import interrupted: {}", report.summary());
        ImportError::Interrupted { report, source }
    };

    for place in document.todo_places {
        match store.add_todo_place(place) {
            Ok(true) => report.todo_added += 1,
            Ok(false) => report.todo_skipped += 1,
            Err(e) => return Err(interrupted(report, e)),
        }
    }

    for record in document.visited_places {
        match store.import_visited_place(record) {
            Ok(true) => report.visited_added += 1,
            Ok(false) => report.visited_skipped += 1,
            Err(e) => return Err(interrupted(report, e)),
        }
    }

    if let Some(patch) = document.settings.filter(|patch| !patch.is_empty()) {
        store
            .update_settings(&patch)
            .map_err(|e| interrupted(report, e))?;
        report.settings_applied = true;
    }

    info!(
        todo_added = report.todo_added,
        todo_skipped = report.todo_skipped,
        visited_added = report.visited_added,
        visited_skipped = report.visited_skipped,
        "Import complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wayfarer_domain::traits::StorageKey;
    use wayfarer_store::MemoryBackend;

    #[test]
    fn test_rejects_document_without_places() {
        let err = ImportDocument::from_value(json!({ "settings": {}, "version": "1.0" })).unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(ImportDocument::from_value(json!([1, 2, 3])).is_err());
        assert!(ImportDocument::from_json("{ not json").is_err());
    }

    #[test]
    fn test_rejects_other_versions() {
        let err = ImportDocument::from_value(json!({ "todoPlaces": [], "version": "2.0" })).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedVersion(ref v) if v == "2.0"));
    }

    #[test]
    fn test_rejects_malformed_entry_before_applying() {
        // A visited entry without an id cannot be restored
        let err = ImportDocument::from_value(json!({
            "todoPlaces": [{ "name": "Park" }],
            "visitedPlaces": [{ "name": "Museum" }]
        }))
        .unwrap_err();
        assert!(matches!(err, ImportError::Malformed(_)));
    }

    #[test]
    fn test_accepts_legacy_export() {
        let document = ImportDocument::from_value(json!({
            "todoPlaces": [{
                "name": "Cafe Luna",
                "address": "1 Main St",
                "lat": 10.0,
                "lng": 20.0,
                "placeId": "Cafe+Luna",
                "url": "https://maps.example/place/Cafe+Luna",
                "extractedAt": "2024-03-01T10:00:00.000Z",
                "addedAt": "2024-03-01T10:00:05.000Z",
                "id": "lt3k9x0abc"
            }],
            "settings": { "promptDelay": 4000 },
            "exportedAt": "2024-03-02T00:00:00.000Z",
            "version": "1.0"
        }))
        .unwrap();

        assert_eq!(document.todo_places.len(), 1);
        assert_eq!(document.todo_places[0].external_id.as_deref(), Some("Cafe+Luna"));
        assert_eq!(document.settings.unwrap().prompt_delay_ms, Some(4000));
    }

    #[test]
    fn test_apply_counts_and_dedupes() {
        let mut store = PlaceStore::open(MemoryBackend::new()).unwrap();
        store.add_todo_place(PlaceObservation::new("Park")).unwrap();

        let document = ImportDocument {
            todo_places: vec![PlaceObservation::new("Park"), PlaceObservation::new("Zoo")],
            visited_places: Vec::new(),
            settings: Some(SettingsPatch {
                auto_prompt: Some(false),
                ..Default::default()
            }),
        };

        let report = apply_import(&mut store, document).unwrap();
        assert_eq!(report.todo_added, 1);
        assert_eq!(report.todo_skipped, 1);
        assert!(report.settings_applied);
        assert!(!store.settings().auto_prompt);
        assert_eq!(store.todo_places().len(), 2);
    }

    #[test]
    fn test_empty_settings_are_not_reported_as_applied() {
        let mut store = PlaceStore::open(MemoryBackend::new()).unwrap();
        let document = ImportDocument::from_value(json!({
            "todoPlaces": [],
            "settings": {}
        }))
        .unwrap();

        let report = apply_import(&mut store, document).unwrap();
        assert!(!report.settings_applied);
    }

    /// Backend that accepts a fixed number of writes, then fails every one
    struct WriteBudget {
        inner: MemoryBackend,
        writes_left: usize,
    }

    impl PersistenceBackend for WriteBudget {
        type Error = std::io::Error;

        fn load(&self, key: StorageKey) -> Result<Option<String>, Self::Error> {
            Ok(self.inner.get(key).map(str::to_string))
        }

        fn save(&mut self, key: StorageKey, value: &str) -> Result<(), Self::Error> {
            self.save_all(&[(key, value.to_string())])
        }

        fn save_all(&mut self, entries: &[(StorageKey, String)]) -> Result<(), Self::Error> {
            if self.writes_left == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            self.writes_left -= 1;
            self.inner.save_all(entries).map_err(|e| match e {})
        }

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.inner.clear().map_err(|e| match e {})
        }
    }

    #[test]
    fn test_interrupted_import_reports_what_landed() {
        let backend = WriteBudget {
            inner: MemoryBackend::new(),
            writes_left: 2,
        };
        let mut store = PlaceStore::open(backend).unwrap();
        let document = ImportDocument {
            todo_places: vec![
                PlaceObservation::new("Park"),
                PlaceObservation::new("Zoo"),
                PlaceObservation::new("Harbour Bridge"),
            ],
            ..Default::default()
        };

        let err = apply_import(&mut store, document).unwrap_err();
        match &err {
            ImportError::Interrupted { report, source } => {
                assert_eq!(report.todo_added, 2);
                assert!(matches!(source, StoreError::Persistence(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("Imported 2 todo"));
        assert!(err.to_string().contains("disk full"));
    }
}
