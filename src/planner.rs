//! Route composer
//!
//! Chains geocoding, venue lookup, two station selections, the bike
//! routing call, and derived metric computation into one itinerary.
//! Every stage can short-circuit to a distinct, user-readable failure;
//! no partial itinerary is ever returned.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::VeloplanError;
use crate::geocoder::Geocode;
use crate::models::{Itinerary, Station};
use crate::routing::BikeRouting;
use crate::selector::{select_station, CapacityRequirement};
use crate::venues::VenueCatalog;
use crate::Result;

/// The user-facing parameters of one trip query
#[derive(Debug, Clone)]
pub struct TripRequest {
    /// Free-text start address
    pub address: String,
    /// Selected venue name, exact match against the catalog
    pub venue_name: String,
    /// People taking the trip; each needs one bike and one dock
    pub party_size: u32,
}

/// Composes itineraries from the injected remote adapters.
///
/// The planner itself is deterministic: given the same station
/// inventory and the same adapter answers, it produces the same
/// itinerary.
pub struct TripPlanner {
    geocoder: Arc<dyn Geocode>,
    router: Arc<dyn BikeRouting>,
}

impl TripPlanner {
    /// Create a planner over the given adapters
    pub fn new(geocoder: Arc<dyn Geocode>, router: Arc<dyn BikeRouting>) -> Self {
        Self { geocoder, router }
    }

    /// Plan a walk + bike + walk trip.
    ///
    /// Stages run strictly in order: geocode, venue lookup, origin
    /// station selection, destination station selection, bike routing,
    /// derived metrics. The first failing stage aborts the whole
    /// composition.
    pub async fn plan(
        &self,
        request: &TripRequest,
        venues: &VenueCatalog,
        stations: &[Station],
    ) -> Result<Itinerary> {
        if request.party_size < 1 {
            return Err(VeloplanError::validation("Party size must be at least 1"));
        }
        if request.address.trim().is_empty() {
            return Err(VeloplanError::validation("Address cannot be empty"));
        }
        if stations.is_empty() {
            // An empty inventory means the feed refresh failed or the
            // network is down; selection must not run against it.
            return Err(VeloplanError::feed_unavailable(
                "Station inventory is empty",
            ));
        }

        debug!(
            "Planning trip from '{}' to '{}' for a party of {}",
            request.address, request.venue_name, request.party_size
        );

        let start = self
            .geocoder
            .geocode(&request.address)
            .await?
            .ok_or_else(|| VeloplanError::AddressNotFound {
                address: request.address.clone(),
            })?;

        let venue = venues
            .find(&request.venue_name)
            .ok_or_else(|| {
                VeloplanError::validation(format!(
                    "Venue '{}' is not in the catalog",
                    request.venue_name
                ))
            })?
            .clone();

        let origin_station = select_station(
            &start,
            stations,
            request.party_size,
            CapacityRequirement::AvailableBikes,
        )
        .ok_or(VeloplanError::NoFeasibleOrigin {
            party_size: request.party_size,
        })?
        .clone();

        let destination_station = select_station(
            &venue.coordinate,
            stations,
            request.party_size,
            CapacityRequirement::FreeDocks,
        )
        .ok_or(VeloplanError::NoFeasibleDestination {
            party_size: request.party_size,
        })?
        .clone();

        let bike_route = self
            .router
            .route(&origin_station.coordinate, &destination_station.coordinate)
            .await?;

        let itinerary = Itinerary::compose(
            start,
            origin_station,
            destination_station,
            venue,
            bike_route,
            request.party_size,
        );

        info!(
            "Planned trip: walk {:.2} km, bike {:.2} km, walk {:.2} km, {:.0} g CO2 avoided",
            itinerary.walk1_km, itinerary.bike.distance_km, itinerary.walk2_km, itinerary.co2_grams
        );

        Ok(itinerary)
    }
}
