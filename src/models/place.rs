use serde::{Deserialize, Serialize};
use std::fmt;

/// Degrees of latitude/longitude shown around a region's center.
const DEFAULT_SPAN: f64 = 0.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A search result from the place search API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}, {:.4})",
            self.name, self.coordinate.latitude, self.coordinate.longitude
        )
    }
}

/// The visible area of the store map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapRegion {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for MapRegion {
    /// San Francisco, until a search moves the map.
    fn default() -> Self {
        Self::centered_on(Coordinate::new(37.7749, -122.4194))
    }
}

impl MapRegion {
    pub fn centered_on(center: Coordinate) -> Self {
        Self {
            center,
            latitude_delta: DEFAULT_SPAN,
            longitude_delta: DEFAULT_SPAN,
        }
    }

    /// Region centered on the first place, or the default region when
    /// there are no results.
    pub fn for_results(places: &[Place]) -> Self {
        places
            .first()
            .map(|p| Self::centered_on(p.coordinate))
            .unwrap_or_default()
    }
}
