//! Static state-centroid table and state-name normalisation.
//!
//! The table only covers the states that host the manufacturers in the
//! bundled maker export. Makers in any other state cannot be placed on the
//! map and surface as join mismatches.

use crate::models::Coordinate;

/// Centroids used to place makers on the map, keyed by title-case state name.
pub const STATE_COORDINATES: [Coordinate; 11] = [
    Coordinate { state: "Maharashtra", lat: 19.7515, lon: 75.7139 },
    Coordinate { state: "Tamil Nadu", lat: 11.1271, lon: 78.6569 },
    Coordinate { state: "Karnataka", lat: 15.3173, lon: 75.7139 },
    Coordinate { state: "Delhi", lat: 28.7041, lon: 77.1025 },
    Coordinate { state: "Gujarat", lat: 22.2587, lon: 71.1924 },
    Coordinate { state: "Haryana", lat: 29.0588, lon: 76.0856 },
    Coordinate { state: "Telangana", lat: 18.1124, lon: 79.0193 },
    Coordinate { state: "Uttar Pradesh", lat: 26.8467, lon: 80.9462 },
    Coordinate { state: "West Bengal", lat: 22.9868, lon: 87.8550 },
    Coordinate { state: "Rajasthan", lat: 27.0238, lon: 74.2179 },
    Coordinate { state: "Andhra Pradesh", lat: 15.9129, lon: 79.7400 },
];

/// Look up a state's centroid in `table` by exact name.
pub fn find_coordinate<'a>(table: &'a [Coordinate], state: &str) -> Option<&'a Coordinate> {
    table.iter().find(|c| c.state == state)
}

/// Title-case a state name: the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased.
///
/// Any non-alphabetic character (space, hyphen, digit, apostrophe) starts a
/// new run, so `"jammu-kashmir"` becomes `"Jammu-Kashmir"`.
///
/// # Examples
///
/// ```
/// use ev_core::geo::title_case;
///
/// assert_eq!(title_case("maharashtra"), "Maharashtra");
/// assert_eq!(title_case("TAMIL NADU"), "Tamil Nadu");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
