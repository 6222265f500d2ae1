//! Bike-share station state

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A physical bike-share dock location with live capacity counts.
///
/// Stations are sourced fresh from the live feed each session; no
/// identity is tracked across refreshes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// Street address of the dock
    pub address: String,
    /// Dock location
    pub coordinate: Coordinate,
    /// Bikes currently available for pickup
    pub bikes_available: u32,
    /// Free docks currently available for drop-off
    pub docks_free: u32,
}

impl Station {
    /// True if the station can supply a bike to every member of the party
    #[must_use]
    pub fn can_supply_bikes(&self, party_size: u32) -> bool {
        self.bikes_available >= party_size
    }

    /// True if the station can dock a bike from every member of the party
    #[must_use]
    pub fn can_receive_bikes(&self, party_size: u32) -> bool {
        self.docks_free >= party_size
    }
}
