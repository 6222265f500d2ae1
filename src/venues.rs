//! Venue catalog loader
//!
//! Loads the static list of cultural venues from a CSV export. The
//! export carries venue names under the `equipamien` column and
//! coordinates already reprojected to WGS84; reprojection from the
//! source's planar CRS happens upstream.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::VeloplanError;
use crate::models::{Coordinate, Venue};
use crate::Result;

/// The session's read-only set of destination venues
#[derive(Debug, Clone)]
pub struct VenueCatalog {
    venues: Vec<Venue>,
}

/// A raw catalog row; rows with missing fields are skipped on load
#[derive(Debug, Deserialize)]
struct VenueRow {
    equipamien: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl VenueCatalog {
    /// Load the catalog from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading venue catalog from {}", path.display());
        let file = File::open(path).map_err(|e| {
            VeloplanError::catalog(format!("Cannot open venue catalog {}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    /// Load the catalog from any CSV reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut venues = Vec::new();
        for row in csv_reader.deserialize::<VenueRow>() {
            let row = row
                .map_err(|e| VeloplanError::catalog(format!("Malformed catalog row: {e}")))?;
            let (Some(name), Some(lat), Some(lon)) = (row.equipamien, row.lat, row.lon) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            venues.push(Venue::new(name, Coordinate::new(lat, lon)));
        }

        info!("Loaded {} venues from catalog", venues.len());
        Ok(Self { venues })
    }

    /// Find a venue by exact name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Venue> {
        self.venues.iter().find(|venue| venue.name == name)
    }

    /// Venue names for populating the UI's choice list
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.venues.iter().map(|venue| venue.name.as_str()).collect()
    }

    /// Number of venues in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    /// True if the catalog holds no venues
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}
