//! Composed trip itinerary and derived metrics

use serde::{Deserialize, Serialize};

use super::{Coordinate, Station, Venue};
use crate::geo;

/// A cyclable path between two stations, as returned by the routing service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BikeRoute {
    /// Route geometry for the presentation layer
    pub path: Vec<Coordinate>,
    /// Total cyclable distance in kilometers
    pub distance_km: f64,
    /// Estimated riding time in minutes
    pub duration_min: f64,
}

/// The composed three-segment trip plan: walk, bike, walk.
///
/// Built once per query and never mutated; a new query produces a new
/// itinerary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Itinerary {
    /// Geocoded start coordinate
    pub start: Coordinate,
    /// Station where bikes are picked up
    pub origin_station: Station,
    /// Station where bikes are dropped off
    pub destination_station: Station,
    /// Destination venue
    pub venue: Venue,
    /// First walking leg: start to origin station, straight-line km
    pub walk1_km: f64,
    /// First walking leg time in minutes
    pub walk1_min: f64,
    /// Bike leg between the two stations
    pub bike: BikeRoute,
    /// Second walking leg: destination station to venue, straight-line km
    pub walk2_km: f64,
    /// Second walking leg time in minutes
    pub walk2_min: f64,
    /// Estimated CO2 avoided versus the car trip not taken, in grams
    pub co2_grams: f64,
}

impl Itinerary {
    /// Compose an itinerary from the selected stations and bike route,
    /// computing the derived walking and emissions metrics.
    ///
    /// Walking legs use straight-line geodesic distance, not a walking
    /// network.
    #[must_use]
    pub fn compose(
        start: Coordinate,
        origin_station: Station,
        destination_station: Station,
        venue: Venue,
        bike: BikeRoute,
        party_size: u32,
    ) -> Self {
        let walk1_km = geo::distance_km(&start, &origin_station.coordinate);
        let walk2_km = geo::distance_km(&destination_station.coordinate, &venue.coordinate);
        let co2_grams = geo::co2_avoided_grams(bike.distance_km, party_size);

        Self {
            start,
            origin_station,
            destination_station,
            venue,
            walk1_km,
            walk1_min: geo::walk_time_min(walk1_km),
            bike,
            walk2_km,
            walk2_min: geo::walk_time_min(walk2_km),
            co2_grams,
        }
    }
}
