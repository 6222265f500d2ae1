//! Data models for the Veloplan application
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: Geographic coordinates (WGS84)
//! - Station: Bike-share station state from the live feed
//! - Venue: Cultural venue destinations from the static catalog
//! - Itinerary: The composed walk + bike + walk trip plan

pub mod coordinate;
pub mod itinerary;
pub mod station;
pub mod venue;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use itinerary::{BikeRoute, Itinerary};
pub use station::Station;
pub use venue::Venue;
