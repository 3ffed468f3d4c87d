//! Similarity scoring between place names and positions
//!
//! Pure functions only. Name similarity is a normalized Levenshtein score and
//! positions are compared by great-circle distance.

use crate::place::Coordinates;

/// Mean Earth radius in meters used by the haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Levenshtein edit distance over Unicode scalar values.
///
/// Insertion, deletion and substitution each cost 1; transpositions are not
/// special-cased.
///
/// ```
/// use wayfarer_domain::similarity::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Keep the shorter string on the row axis
    let (target, source) = if a.len() < b.len() { (&a, &b) } else { (&b, &a) };
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, &sc) in source.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;

        for (j, &tc) in target.iter().enumerate() {
            let cost = usize::from(sc != tc);
            let substitution = prev + cost;
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;

            prev = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }

    row[target.len()]
}

/// Case-insensitive similarity in `[0, 1]`.
///
/// Computed as `1 - levenshtein(a, b) / max(len(a), len(b))` after lower-casing
/// both inputs. Two empty strings are identical.
///
/// ```
/// use wayfarer_domain::similarity::string_similarity;
///
/// assert_eq!(string_similarity("Cafe Luna", "cafe luna"), 1.0);
/// assert_eq!(string_similarity("", ""), 1.0);
/// assert_eq!(string_similarity("abc", ""), 0.0);
/// ```
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

/// Great-circle distance between two points, in meters (haversine formula).
///
/// ```
/// use wayfarer_domain::Coordinates;
/// use wayfarer_domain::similarity::geo_distance_meters;
///
/// let p = Coordinates::new(48.8584, 2.2945);
/// assert_eq!(geo_distance_meters(p, p), 0.0);
/// ```
pub fn geo_distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("abc", "abd"), 1);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        // no transposition discount
        assert_eq!(levenshtein("ab", "ba"), 2);
    }

    #[test]
    fn test_levenshtein_unicode() {
        assert_eq!(levenshtein("café", "cafe"), 1);
        assert_eq!(levenshtein("東京", "東京都"), 1);
    }

    #[test]
    fn test_trailing_space_similarity() {
        // "cafe luna" vs "cafe luna " -> 1 edit over 10 chars
        let s = string_similarity("Cafe Luna", "Cafe Luna ");
        assert!((s - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert_eq!(string_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_geo_distance_known_value() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere
        let d = geo_distance_meters(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111_194.9).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_geo_distance_small_offset() {
        let d = geo_distance_meters(
            Coordinates::new(10.0, 20.0),
            Coordinates::new(10.0005, 20.0005),
        );
        assert!(d > 60.0 && d < 90.0, "got {}", d);
    }

    #[test]
    fn test_geo_distance_symmetric() {
        let a = Coordinates::new(51.5007, -0.1246);
        let b = Coordinates::new(40.6892, -74.0445);
        assert_eq!(geo_distance_meters(a, b), geo_distance_meters(b, a));
    }
}
