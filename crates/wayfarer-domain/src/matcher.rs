//! Identity resolution - deciding whether two place mentions are the same place

use crate::place::{PlaceFacts, PlaceRecord};
use crate::similarity::{geo_distance_meters, string_similarity};
use serde::{Deserialize, Serialize};

/// Thresholds used by [`PlaceMatcher`]
///
/// Coordinates corroborate a name, so the name bar is lower when both sides
/// are within `max_distance_meters` of each other. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Name similarity required when both sides have coordinates
    /// Default: 0.8
    pub corroborated_similarity: f64,

    /// Name similarity required when at least one side lacks coordinates
    /// Default: 0.9
    pub uncorroborated_similarity: f64,

    /// Maximum distance between corroborating coordinates
    /// Default: 100 meters
    pub max_distance_meters: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            corroborated_similarity: 0.8,
            uncorroborated_similarity: 0.9,
            max_distance_meters: 100.0,
        }
    }
}

/// Fuzzy place identity resolution
///
/// # Examples
///
/// ```
/// use wayfarer_domain::{PlaceMatcher, PlaceObservation};
///
/// let matcher = PlaceMatcher::default();
/// let a = PlaceObservation::new("Louvre").with_external_id("ChIJ-louvre");
/// let b = PlaceObservation::new("Musée du Louvre").with_external_id("ChIJ-louvre");
///
/// // Equal provider identifiers settle it without comparing names
/// assert!(matcher.is_same_place(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaceMatcher {
    thresholds: MatchThresholds,
}

impl PlaceMatcher {
    /// Create a matcher with the given thresholds
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds in effect
    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Decide whether `a` and `b` denote the same real-world place.
    ///
    /// Evaluated in order:
    /// 1. equal non-empty provider identifiers match outright
    /// 2. a blank name on either side never matches
    /// 3. with coordinates on both sides: similarity above the corroborated
    ///    threshold and distance below the limit
    /// 4. otherwise: similarity above the uncorroborated threshold
    pub fn is_same_place<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: PlaceFacts + ?Sized,
        B: PlaceFacts + ?Sized,
    {
        if let (Some(ext_a), Some(ext_b)) = (a.external_id(), b.external_id()) {
            if !ext_a.is_empty() && ext_a == ext_b {
                return true;
            }
        }

        if a.name().trim().is_empty() || b.name().trim().is_empty() {
            return false;
        }

        let similarity = string_similarity(a.name(), b.name());

        match (a.coordinates(), b.coordinates()) {
            (Some(ca), Some(cb)) => {
                similarity > self.thresholds.corroborated_similarity
                    && geo_distance_meters(ca, cb) < self.thresholds.max_distance_meters
            }
            _ => similarity > self.thresholds.uncorroborated_similarity,
        }
    }

    /// First record, in iteration order, that is the same place as `candidate`.
    ///
    /// Ties are settled by order, not by similarity: a later, closer match is
    /// never preferred over an earlier one.
    pub fn find_match<'a, C, I>(&self, candidate: &C, records: I) -> Option<&'a PlaceRecord>
    where
        C: PlaceFacts + ?Sized,
        I: IntoIterator<Item = &'a PlaceRecord>,
    {
        records
            .into_iter()
            .find(|record| self.is_same_place(*record, candidate))
    }
}
