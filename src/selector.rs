//! Nearest-feasible-station selector
//!
//! Pure selection logic: filter the inventory by a capacity predicate,
//! then pick the station closest to the target coordinate. An empty
//! eligible set is a normal outcome, reported as `None`; callers decide
//! what that means for the trip.

use crate::geo;
use crate::models::{Coordinate, Station};

/// Which capacity field a station must satisfy to be eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityRequirement {
    /// Origin stations must have bikes to hand out
    AvailableBikes,
    /// Destination stations must have docks to receive bikes
    FreeDocks,
}

impl CapacityRequirement {
    fn capacity_of(self, station: &Station) -> u32 {
        match self {
            CapacityRequirement::AvailableBikes => station.bikes_available,
            CapacityRequirement::FreeDocks => station.docks_free,
        }
    }
}

/// Select the station nearest to `target` whose relevant capacity field
/// is at least `min_count`.
///
/// The valid domain is `min_count >= 1`; the route composer validates
/// party size before calling. Ties are broken by first-encountered
/// order. The input collection is never mutated.
#[must_use]
pub fn select_station<'a>(
    target: &Coordinate,
    stations: &'a [Station],
    min_count: u32,
    requirement: CapacityRequirement,
) -> Option<&'a Station> {
    stations
        .iter()
        .filter(|station| requirement.capacity_of(station) >= min_count)
        .map(|station| (station, geo::distance_meters(target, &station.coordinate)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(station, _)| station)
}
