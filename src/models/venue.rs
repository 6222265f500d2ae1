//! Cultural venue destinations

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A destination venue from the static catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Venue {
    /// Venue name as it appears in the catalog
    pub name: String,
    /// Venue location (already reprojected to WGS84)
    pub coordinate: Coordinate,
}

impl Venue {
    /// Create a new venue
    #[must_use]
    pub fn new(name: String, coordinate: Coordinate) -> Self {
        Self { name, coordinate }
    }
}
