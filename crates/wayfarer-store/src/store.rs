//! The place store - todo/visited collections, settings, and their persistence

use crate::StoreError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use wayfarer_domain::traits::{PersistenceBackend, StorageKey};
use wayfarer_domain::{
    ExportSnapshot, PlaceId, PlaceMatcher, PlaceObservation, PlaceRecord, PlaceStatus, Settings,
    SettingsPatch,
};

/// Outcome of looking up an observation in both collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// A todo record matched
    pub is_todo: bool,

    /// A visited record matched
    pub is_visited: bool,

    /// The matching todo record
    pub todo_match: Option<PlaceRecord>,

    /// The matching visited record
    pub visited_match: Option<PlaceRecord>,

    /// The UI should ask whether the place was visited
    pub should_prompt: bool,
}

/// Collection sizes, as shown next to each list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceStats {
    /// Number of todo places
    pub todo_count: usize,

    /// Number of visited places
    pub visited_count: usize,
}

/// Owner of the todo and visited collections and the user's settings
///
/// Every mutation persists the whole aggregate through the backend before it
/// returns. The store itself is not synchronized; callers that share it must
/// serialize access (see the service crate's store actor).
///
/// # Examples
///
/// ```
/// use wayfarer_domain::PlaceObservation;
/// use wayfarer_store::{MemoryBackend, PlaceStore};
///
/// let mut store = PlaceStore::open(MemoryBackend::new()).unwrap();
/// assert!(store.add_todo_place(PlaceObservation::new("Blue Bottle Coffee")).unwrap());
///
/// let check = store.check_place(&PlaceObservation::new("Blue Bottle Coffee"));
/// assert!(check.is_todo);
/// assert!(check.should_prompt);
/// ```
pub struct PlaceStore<B> {
    backend: B,
    matcher: PlaceMatcher,
    todo: Vec<PlaceRecord>,
    visited: Vec<PlaceRecord>,
    settings: Settings,
}

impl<B: PersistenceBackend> PlaceStore<B> {
    /// Open a store over `backend` with the default matcher
    pub fn open(backend: B) -> Result<Self, StoreError> {
        Self::open_with_matcher(backend, PlaceMatcher::default())
    }

    /// Open a store over `backend`, loading whatever it already holds
    ///
    /// Absent keys load as empty collections and default settings. Stored
    /// values that cannot be decoded fail with [`StoreError::Corrupt`] rather
    /// than being overwritten later.
    pub fn open_with_matcher(backend: B, matcher: PlaceMatcher) -> Result<Self, StoreError> {
        let todo = load_json::<_, Vec<PlaceRecord>>(&backend, StorageKey::TodoPlaces)?.unwrap_or_default();
        let visited =
            load_json::<_, Vec<PlaceRecord>>(&backend, StorageKey::VisitedPlaces)?.unwrap_or_default();
        let settings = load_json::<_, SettingsPatch>(&backend, StorageKey::Settings)?
            .map(|patch| Settings::from_patch(&patch))
            .unwrap_or_default();

        let mut store = Self {
            backend,
            matcher,
            todo,
            visited,
            settings,
        };
        store.enforce_invariants();

        info!(
            todo_count = store.todo.len(),
            visited_count = store.visited.len(),
            thresholds = ?store.matcher.thresholds(),
            "Loaded place data"
        );

        Ok(store)
    }

    /// The persistence backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Todo places in insertion order
    pub fn todo_places(&self) -> &[PlaceRecord] {
        &self.todo
    }

    /// Visited places in the order they were visited
    pub fn visited_places(&self) -> &[PlaceRecord] {
        &self.visited
    }

    /// Collection sizes
    pub fn stats(&self) -> PlaceStats {
        PlaceStats {
            todo_count: self.todo.len(),
            visited_count: self.visited.len(),
        }
    }

    /// Look `observation` up in both collections. Never mutates or persists.
    ///
    /// The two lookups are independent, so inconsistent data could report a
    /// match in both.
    pub fn check_place(&self, observation: &PlaceObservation) -> CheckResult {
        if !observation.has_name() {
            debug!("Ignoring observation without a name");
            return CheckResult::default();
        }

        let todo_match = self.matcher.find_match(observation, &self.todo).cloned();
        let visited_match = self.matcher.find_match(observation, &self.visited).cloned();
        let should_prompt = todo_match.is_some() && visited_match.is_none() && self.settings.auto_prompt;

        debug!(
            name = %observation.name,
            is_todo = todo_match.is_some(),
            is_visited = visited_match.is_some(),
            "Checked place"
        );

        CheckResult {
            is_todo: todo_match.is_some(),
            is_visited: visited_match.is_some(),
            todo_match,
            visited_match,
            should_prompt,
        }
    }

    /// Add `observation` to the todo list unless it is already known.
    ///
    /// Returns `false` without touching anything when the observation has no
    /// name or matches a todo or visited record.
    pub fn add_todo_place(&mut self, observation: PlaceObservation) -> Result<bool, StoreError> {
        if !observation.has_name() {
            debug!("Refusing to add a place without a name");
            return Ok(false);
        }

        if let Some(existing) = self
            .matcher
            .find_match(&observation, self.todo.iter().chain(self.visited.iter()))
        {
            debug!(
                name = %observation.name,
                existing = %existing.id,
                "Place already known, not adding"
            );
            return Ok(false);
        }

        let record = PlaceRecord::from_observation(observation, Utc::now());
        info!(
            id = %record.id,
            name = %record.place.name,
            status = %record.status(),
            "Added place"
        );
        self.todo.push(record);

        self.persist()?;
        Ok(true)
    }

    /// Move the todo record whose `id` or external id equals `identifier` to
    /// the visited list.
    ///
    /// Returns `false` when no todo record has that identifier.
    pub fn mark_as_visited(&mut self, identifier: &str) -> Result<bool, StoreError> {
        let Some(index) = self.position_in_todo(identifier) else {
            debug!(identifier, "No todo place to mark as visited");
            return Ok(false);
        };

        if !self.todo[index].status().can_transition_to(PlaceStatus::Visited) {
            warn!(id = %self.todo[index].id, "Todo record cannot become visited");
            return Ok(false);
        }

        let visited = self.todo[index].visited(Utc::now());
        self.todo.remove(index);
        info!(
            id = %visited.id,
            name = %visited.place.name,
            status = %visited.status(),
            "Marked place as visited"
        );
        self.visited.push(visited);

        self.persist()?;
        Ok(true)
    }

    /// Remove the todo record whose `id` or external id equals `identifier`
    ///
    /// Returns whether anything was removed.
    pub fn remove_todo_place(&mut self, identifier: &str) -> Result<bool, StoreError> {
        let Some(index) = self.position_in_todo(identifier) else {
            debug!(identifier, "No todo place to remove");
            return Ok(false);
        };

        let removed = self.todo.remove(index);
        info!(id = %removed.id, name = %removed.place.name, "Removed todo place");

        self.persist()?;
        Ok(true)
    }

    /// Merge `patch` over the current settings and persist
    ///
    /// An empty patch changes nothing and writes nothing.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            debug!("Empty settings update, nothing to persist");
            return Ok(());
        }

        self.settings.apply(patch);
        debug!(settings = ?self.settings, "Updated settings");
        self.persist()
    }

    /// Deep copy of everything the store holds, for export
    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot::new(self.todo.clone(), self.visited.clone(), self.settings, Utc::now())
    }

    /// Restore a visited record from an import file.
    ///
    /// - matches a visited record: nothing happens, returns `false`
    /// - matches a todo record: that record becomes visited
    /// - otherwise: the record is appended to the visited list, under a fresh
    ///   id if its own is already taken
    ///
    /// The imported `visitedAt` is kept; a missing one is stamped now.
    pub fn import_visited_place(&mut self, record: PlaceRecord) -> Result<bool, StoreError> {
        if !record.place.has_name() {
            debug!("Refusing to import a visited place without a name");
            return Ok(false);
        }

        if self.matcher.find_match(&record, &self.visited).is_some() {
            debug!(name = %record.place.name, "Visited place already known");
            return Ok(false);
        }

        let visited_at = record.visited_at.unwrap_or_else(Utc::now);

        match self.todo.iter().position(|todo| {
            todo.status().can_transition_to(PlaceStatus::Visited)
                && self.matcher.is_same_place(todo, &record)
        }) {
            Some(index) => {
                let visited = self.todo[index].visited(visited_at);
                self.todo.remove(index);
                info!(id = %visited.id, status = %visited.status(), "Imported visit for existing todo place");
                self.visited.push(visited);
            }
            None => {
                let mut record = record;
                record.visited_at = Some(visited_at);
                if self.contains_id(&record.id) {
                    record.id = PlaceId::new();
                }
                info!(
                    id = %record.id,
                    name = %record.place.name,
                    status = %record.status(),
                    "Imported visited place"
                );
                self.visited.push(record);
            }
        }

        self.persist()?;
        Ok(true)
    }

    /// Empty both collections, restore default settings, and erase storage
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.todo.clear();
        self.visited.clear();
        self.settings = Settings::default();
        info!("Cleared all place data");

        self.backend
            .clear()
            .map_err(|e| StoreError::Persistence(e.to_string()))
    }

    fn position_in_todo(&self, identifier: &str) -> Option<usize> {
        self.todo
            .iter()
            .position(|record| record.matches_identifier(identifier))
    }

    fn contains_id(&self, id: &PlaceId) -> bool {
        self.todo.iter().chain(self.visited.iter()).any(|r| &r.id == id)
    }

    /// Write the whole aggregate, retrying once on failure
    fn persist(&mut self) -> Result<(), StoreError> {
        let entries = vec![
            (StorageKey::TodoPlaces, serde_json::to_string(&self.todo)?),
            (StorageKey::VisitedPlaces, serde_json::to_string(&self.visited)?),
            (StorageKey::Settings, serde_json::to_string(&self.settings)?),
        ];

        if let Err(first) = self.backend.save_all(&entries) {
            warn!(error = %first, "Saving place data failed, retrying once");
            self.backend
                .save_all(&entries)
                .map_err(|e| StoreError::Persistence(e.to_string()))?;
        }

        Ok(())
    }

    /// Repair loaded data so every id lives in exactly one collection
    fn enforce_invariants(&mut self) {
        let (stray, todo): (Vec<_>, Vec<_>) = std::mem::take(&mut self.todo)
            .into_iter()
            .partition(|record| record.visited_at.is_some());
        if !stray.is_empty() {
            warn!(count = stray.len(), "Moving visited records out of the todo list");
        }
        self.todo = todo;
        self.visited.extend(stray);

        for record in self.visited.iter_mut().filter(|r| r.visited_at.is_none()) {
            warn!(id = %record.id, "Visited record without visitedAt, using addedAt");
            record.visited_at = Some(record.added_at);
        }

        let mut seen = HashSet::new();
        self.visited.retain(|record| {
            let fresh = seen.insert(record.id.clone());
            if !fresh {
                warn!(id = %record.id, "Dropping duplicate visited record");
            }
            fresh
        });

        // `seen` now holds every visited id; todo copies of those are dropped too
        self.todo.retain(|record| {
            let fresh = seen.insert(record.id.clone());
            if !fresh {
                warn!(id = %record.id, "Dropping duplicate todo record");
            }
            fresh
        });
    }
}

fn load_json<B, T>(backend: &B, key: StorageKey) -> Result<Option<T>, StoreError>
where
    B: PersistenceBackend,
    T: serde::de::DeserializeOwned,
{
    let raw = backend
        .load(key)
        .map_err(|e| StoreError::Persistence(e.to_string()))?;

    match raw {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source }),
        None => Ok(None),
    }
}
