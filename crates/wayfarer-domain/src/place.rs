//! Place module - observations scraped from a map page and the records they become

use crate::status::PlaceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored place record
///
/// Fresh identifiers are UUIDv7 strings, which sort chronologically and need no
/// coordination between writers. Identifiers read back from storage or from an
/// imported file are kept verbatim, whatever format produced them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    /// Generate a new UUIDv7-based PlaceId
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer_domain::PlaceId;
    ///
    /// let id = PlaceId::new();
    /// assert_eq!(id.as_str().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build coordinates from two independently optional wire fields.
    ///
    /// Coordinates exist only when both halves are present and finite.
    ///
    /// ```
    /// use wayfarer_domain::Coordinates;
    ///
    /// assert!(Coordinates::from_parts(Some(1.0), Some(2.0)).is_some());
    /// assert!(Coordinates::from_parts(Some(1.0), None).is_none());
    /// assert!(Coordinates::from_parts(Some(f64::NAN), Some(2.0)).is_none());
    /// ```
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self { lat, lng }),
            _ => None,
        }
    }
}

/// The facts about a place that identity resolution looks at
///
/// Implemented by both [`PlaceObservation`] and [`PlaceRecord`] so either side
/// of a comparison can be a fresh observation or a stored record.
pub trait PlaceFacts {
    /// Display name as scraped
    fn name(&self) -> &str;

    /// Coordinates, when the page exposed them
    fn coordinates(&self) -> Option<Coordinates>;

    /// Provider-specific identifier, when known
    fn external_id(&self) -> Option<&str>;
}

/// A transient, possibly incomplete snapshot of a place extracted from a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObservationWire", into = "ObservationWire")]
pub struct PlaceObservation {
    /// Place name; blank names never match anything
    pub name: String,

    /// Street address
    pub address: Option<String>,

    /// Coordinates (both halves or neither)
    pub coordinates: Option<Coordinates>,

    /// Provider-specific identifier
    pub external_id: Option<String>,

    /// Page the observation was taken from
    pub source_url: String,

    /// When the observation was taken
    pub observed_at: DateTime<Utc>,
}

impl PlaceObservation {
    /// Create an observation with just a name, observed now
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            coordinates: None,
            external_id: None,
            source_url: String::new(),
            observed_at: Utc::now(),
        }
    }

    /// Set the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = non_empty(Some(address.into()));
        self
    }

    /// Set the coordinates
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Set the provider-specific identifier
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = non_empty(Some(external_id.into()));
        self
    }

    /// Set the source page URL
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = source_url.into();
        self
    }

    /// Whether the observation carries a usable name
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl PlaceFacts for PlaceObservation {
    fn name(&self) -> &str {
        &self.name
    }

    fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

/// JSON shape shared with the browser deployments.
///
/// Older exports used `placeId`, `url` and `extractedAt`; those names are
/// still accepted on input.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObservationWire {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lng: Option<f64>,
    #[serde(default, alias = "placeId", skip_serializing_if = "Option::is_none")]
    external_id: Option<String>,
    #[serde(default, alias = "url")]
    source_url: String,
    #[serde(default, alias = "extractedAt")]
    observed_at: Option<DateTime<Utc>>,
}

impl From<ObservationWire> for PlaceObservation {
    fn from(wire: ObservationWire) -> Self {
        Self {
            name: wire.name,
            address: non_empty(wire.address),
            coordinates: Coordinates::from_parts(wire.lat, wire.lng),
            external_id: non_empty(wire.external_id),
            source_url: wire.source_url,
            observed_at: wire.observed_at.unwrap_or_else(Utc::now),
        }
    }
}

impl From<PlaceObservation> for ObservationWire {
    fn from(place: PlaceObservation) -> Self {
        Self {
            name: place.name,
            address: place.address,
            lat: place.coordinates.map(|c| c.lat),
            lng: place.coordinates.map(|c| c.lng),
            external_id: place.external_id,
            source_url: place.source_url,
            observed_at: Some(place.observed_at),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The durable representation of a place the user tagged
///
/// A record without `visited_at` belongs to the todo collection; one with it
/// belongs to the visited collection. `id` and `added_at` never change after
/// creation and `visited_at` is set at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    /// Unique identifier
    pub id: PlaceId,

    /// Everything that was observed about the place
    #[serde(flatten)]
    pub place: PlaceObservation,

    /// When the record was created
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,

    /// When the place was marked as visited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<DateTime<Utc>>,
}

impl PlaceRecord {
    /// Create a fresh todo record from an observation
    pub fn from_observation(place: PlaceObservation, added_at: DateTime<Utc>) -> Self {
        Self {
            id: PlaceId::new(),
            place,
            added_at,
            visited_at: None,
        }
    }

    /// Lifecycle state implied by the record's timestamps
    pub fn status(&self) -> PlaceStatus {
        if self.visited_at.is_some() {
            PlaceStatus::Visited
        } else {
            PlaceStatus::Todo
        }
    }

    /// Exact identifier match against `id` or the provider identifier.
    ///
    /// Names are never consulted here.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        if identifier.is_empty() {
            return false;
        }
        self.id.as_str() == identifier || self.place.external_id.as_deref() == Some(identifier)
    }

    /// Copy of this record stamped as visited at `at`
    pub fn visited(&self, at: DateTime<Utc>) -> Self {
        Self {
            visited_at: Some(at),
            ..self.clone()
        }
    }
}

impl PlaceFacts for PlaceRecord {
    fn name(&self) -> &str {
        &self.place.name
    }

    fn coordinates(&self) -> Option<Coordinates> {
        self.place.coordinates
    }

    fn external_id(&self) -> Option<&str> {
        self.place.external_id.as_deref()
    }
}
