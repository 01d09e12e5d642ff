//! Location model for forecast coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Approximate bounding box of Germany, the coverage area of the DWD ICON model.
const GERMANY_NORTH: f64 = 54.737_308;
const GERMANY_SOUTH: f64 = 47.219_568;
const GERMANY_EAST: f64 = 14.567_871;
const GERMANY_WEST: f64 = 5.449_219;

/// Geographic coordinates in decimal degrees.
///
/// Equality and hashing are bit-exact on both fields; two locations a metre
/// apart are different cache keys.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both coordinates finite and within their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        crate::numeric::is_between(-90.0, self.latitude, 90.0)
            && crate::numeric::is_between(-180.0, self.longitude, 180.0)
    }

    #[must_use]
    pub fn is_in_germany(&self) -> bool {
        crate::numeric::is_between(GERMANY_WEST, self.longitude, GERMANY_EAST)
            && crate::numeric::is_between(GERMANY_SOUTH, self.latitude, GERMANY_NORTH)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_coordinates())
    }
}

/// Parse `"lat,lon"`, `"lat, lon"` or `"lat lon"` into a location.
///
/// Returns `None` unless there are exactly two numbers within coordinate ranges.
#[must_use]
pub fn parse_location_string(input: &str) -> Option<Location> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let [lat, lon] = parts.as_slice() else {
        return None;
    };

    let location = Location::new(lat.parse().ok()?, lon.parse().ok()?);
    location.is_valid().then_some(location)
}
