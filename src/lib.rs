//! `Veloplan` - Multimodal walk + bike-share trip planning
//!
//! This library plans a walk, bike-share, walk trip from a free-text
//! address to a cultural venue, using a live station feed, a geocoding
//! service, and a bike-routing service.

pub mod config;
pub mod error;
pub mod geo;
pub mod geocoder;
pub mod models;
pub mod planner;
pub mod routing;
pub mod selector;
pub mod stations;
pub mod venues;

// Re-export core types for public API
pub use config::VeloplanConfig;
pub use error::VeloplanError;
pub use geocoder::{Geocode, OpenCageClient};
pub use models::{BikeRoute, Coordinate, Itinerary, Station, Venue};
pub use planner::{TripPlanner, TripRequest};
pub use routing::{BikeRouting, OsrmClient};
pub use selector::{select_station, CapacityRequirement};
pub use stations::StationFeedClient;
pub use venues::VenueCatalog;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, VeloplanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
