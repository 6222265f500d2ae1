//! Geodesic distance and trip metric formulas

use crate::models::Coordinate;

/// Assumed constant walking speed in km/h
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// Emissions-avoidance factor for the car trip not taken, in grams of
/// CO2 per kilometer per person
pub const CO2_GRAMS_PER_KM_PER_PERSON: f64 = 120.0;

/// Great-circle distance between two coordinates in kilometers
#[must_use]
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}

/// Great-circle distance between two coordinates in meters
#[must_use]
pub fn distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    distance_km(from, to) * 1000.0
}

/// Walking time in minutes for a straight-line distance at 5 km/h
#[must_use]
pub fn walk_time_min(distance_km: f64) -> f64 {
    distance_km / WALKING_SPEED_KMH * 60.0
}

/// Grams of CO2 avoided by cycling instead of driving, one car trip
/// equivalent per person
#[must_use]
pub fn co2_avoided_grams(bike_distance_km: f64, party_size: u32) -> f64 {
    bike_distance_km * CO2_GRAMS_PER_KM_PER_PERSON * f64::from(party_size)
}
