//! Wayfarer Domain Layer
//!
//! This crate contains the place model and the identity-resolution logic that
//! decides whether two place mentions denote the same real-world location.
//! It performs no I/O; storage and page scraping are reached only through the
//! trait interfaces in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Observation**: a transient snapshot of a place scraped from a map page
//! - **Place record**: the durable form, with identity and timestamps
//! - **Status**: the two lifecycle states (todo → visited)
//! - **Matching**: fuzzy name similarity corroborated by geographic proximity
//!
//! ## Matching at a glance
//!
//! ```
//! use wayfarer_domain::{Coordinates, PlaceMatcher, PlaceObservation};
//!
//! let matcher = PlaceMatcher::default();
//! let a = PlaceObservation::new("Cafe Luna").with_coordinates(Coordinates::new(10.0, 20.0));
//! let b = PlaceObservation::new("Cafe Luna ").with_coordinates(Coordinates::new(10.0005, 20.0005));
//!
//! assert!(matcher.is_same_place(&a, &b));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod matcher;
pub mod place;
pub mod settings;
pub mod similarity;
pub mod snapshot;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use matcher::{MatchThresholds, PlaceMatcher};
pub use place::{Coordinates, PlaceFacts, PlaceId, PlaceObservation, PlaceRecord};
pub use settings::{Settings, SettingsPatch};
pub use snapshot::{ExportSnapshot, EXPORT_VERSION};
pub use status::PlaceStatus;
