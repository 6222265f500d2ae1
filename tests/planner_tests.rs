//! End-to-end trip composition tests
//!
//! Remote calls are replaced with in-process fakes, so every scenario
//! here is deterministic and runs without network access.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;

use veloplan::{
    BikeRoute, BikeRouting, CapacityRequirement, Coordinate, Geocode, Station, TripPlanner,
    TripRequest, VeloplanError, VenueCatalog,
};

struct FakeGeocoder {
    result: Option<Coordinate>,
}

#[async_trait]
impl Geocode for FakeGeocoder {
    async fn geocode(&self, _address: &str) -> veloplan::Result<Option<Coordinate>> {
        Ok(self.result)
    }
}

enum FakeRouter {
    Fixed(BikeRoute),
    Unavailable,
}

#[async_trait]
impl BikeRouting for FakeRouter {
    async fn route(&self, _start: &Coordinate, _end: &Coordinate) -> veloplan::Result<BikeRoute> {
        match self {
            FakeRouter::Fixed(route) => Ok(route.clone()),
            FakeRouter::Unavailable => Err(VeloplanError::routing_unavailable("no route")),
        }
    }
}

fn station(address: &str, lat: f64, lon: f64, bikes: u32, docks: u32) -> Station {
    Station {
        address: address.to_string(),
        coordinate: Coordinate::new(lat, lon),
        bikes_available: bikes,
        docks_free: docks,
    }
}

fn catalog() -> VenueCatalog {
    VenueCatalog::from_reader(
        "equipamien,lat,lon\n\
         Museo de Bellas Artes,39.4794,-0.3694\n\
         IVAM,39.4806,-0.3833\n"
            .as_bytes(),
    )
    .unwrap()
}

fn fixed_route() -> BikeRoute {
    BikeRoute {
        path: vec![
            Coordinate::new(39.4705, -0.3765),
            Coordinate::new(39.4790, -0.3700),
        ],
        distance_km: 2.0,
        duration_min: 8.0,
    }
}

fn planner(geocode_result: Option<Coordinate>, router: FakeRouter) -> TripPlanner {
    TripPlanner::new(
        Arc::new(FakeGeocoder {
            result: geocode_result,
        }),
        Arc::new(router),
    )
}

fn request(venue: &str, party_size: u32) -> TripRequest {
    TripRequest {
        address: "Calle de Benidorm".to_string(),
        venue_name: venue.to_string(),
        party_size,
    }
}

#[tokio::test]
async fn plans_full_three_segment_itinerary() {
    let stations = vec![
        station("Origin dock", 39.4705, -0.3765, 4, 2),
        station("Venue dock", 39.4790, -0.3700, 1, 8),
    ];
    let planner = planner(
        Some(Coordinate::new(39.470, -0.376)),
        FakeRouter::Fixed(fixed_route()),
    );

    let itinerary = planner
        .plan(&request("Museo de Bellas Artes", 2), &catalog(), &stations)
        .await
        .unwrap();

    assert_eq!(itinerary.origin_station.address, "Origin dock");
    assert_eq!(itinerary.destination_station.address, "Venue dock");
    assert_eq!(itinerary.venue.name, "Museo de Bellas Artes");
    assert_eq!(itinerary.bike.distance_km, 2.0);
    assert_eq!(itinerary.bike.path.len(), 2);
    // 2 km by bike for two people avoids 480 g of CO2
    assert_eq!(itinerary.co2_grams, 480.0);
    // Walking times follow the 5 km/h assumption
    assert!((itinerary.walk1_min - itinerary.walk1_km / 5.0 * 60.0).abs() < 1e-9);
    assert!((itinerary.walk2_min - itinerary.walk2_km / 5.0 * 60.0).abs() < 1e-9);
}

#[tokio::test]
async fn nearer_but_empty_station_is_skipped() {
    // Geocoded start at (39.470, -0.376); a station ~50 m away has no
    // bikes, one ~200 m away has three. The farther one must win.
    let stations = vec![
        station("Empty nearby", 39.47045, -0.376, 0, 10),
        station("Stocked farther", 39.4718, -0.376, 3, 10),
        station("Venue dock", 39.4790, -0.3700, 0, 10),
    ];
    let planner = planner(
        Some(Coordinate::new(39.470, -0.376)),
        FakeRouter::Fixed(fixed_route()),
    );

    let itinerary = planner
        .plan(&request("Museo de Bellas Artes", 1), &catalog(), &stations)
        .await
        .unwrap();

    assert_eq!(itinerary.origin_station.address, "Stocked farther");
}

#[tokio::test]
async fn empty_inventory_fails_before_selection() {
    let planner = planner(
        Some(Coordinate::new(39.470, -0.376)),
        FakeRouter::Fixed(fixed_route()),
    );

    let result = planner
        .plan(&request("Museo de Bellas Artes", 1), &catalog(), &[])
        .await;

    assert!(matches!(result, Err(VeloplanError::FeedUnavailable { .. })));
}

#[tokio::test]
async fn routing_failure_yields_no_itinerary() {
    let stations = vec![
        station("Origin dock", 39.4705, -0.3765, 4, 2),
        station("Venue dock", 39.4790, -0.3700, 1, 8),
    ];
    let planner = planner(
        Some(Coordinate::new(39.470, -0.376)),
        FakeRouter::Unavailable,
    );

    let result = planner
        .plan(&request("Museo de Bellas Artes", 1), &catalog(), &stations)
        .await;

    assert!(matches!(
        result,
        Err(VeloplanError::RoutingUnavailable { .. })
    ));
}

#[tokio::test]
async fn unresolvable_address_yields_address_not_found() {
    let stations = vec![station("Origin dock", 39.4705, -0.3765, 4, 8)];
    let planner = planner(None, FakeRouter::Fixed(fixed_route()));

    let result = planner
        .plan(&request("Museo de Bellas Artes", 1), &catalog(), &stations)
        .await;

    match result {
        Err(VeloplanError::AddressNotFound { address }) => {
            assert_eq!(address, "Calle de Benidorm");
        }
        other => panic!("expected AddressNotFound, got {other:?}"),
    }
}

#[rstest]
#[case(5, 4, true)]
#[case(5, 6, false)]
#[tokio::test]
async fn party_size_gates_feasibility(
    #[case] capacity: u32,
    #[case] party_size: u32,
    #[case] should_succeed: bool,
) {
    let stations = vec![
        station("Origin dock", 39.4705, -0.3765, capacity, 0),
        station("Venue dock", 39.4790, -0.3700, 0, capacity),
    ];
    let planner = planner(
        Some(Coordinate::new(39.470, -0.376)),
        FakeRouter::Fixed(fixed_route()),
    );

    let result = planner
        .plan(
            &request("Museo de Bellas Artes", party_size),
            &catalog(),
            &stations,
        )
        .await;

    assert_eq!(result.is_ok(), should_succeed);
}

#[tokio::test]
async fn identical_queries_produce_identical_itineraries() {
    let stations = vec![
        station("Origin dock", 39.4705, -0.3765, 4, 2),
        station("Venue dock", 39.4790, -0.3700, 1, 8),
    ];
    let planner = planner(
        Some(Coordinate::new(39.470, -0.376)),
        FakeRouter::Fixed(fixed_route()),
    );

    let first = planner
        .plan(&request("IVAM", 2), &catalog(), &stations)
        .await
        .unwrap();
    let second = planner
        .plan(&request("IVAM", 2), &catalog(), &stations)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn selector_is_usable_standalone() {
    // The selector is exported for callers that manage their own feeds
    let stations = vec![
        station("A", 39.471, -0.377, 2, 0),
        station("B", 39.472, -0.378, 0, 2),
    ];
    let target = Coordinate::new(39.470, -0.376);

    let origin =
        veloplan::select_station(&target, &stations, 1, CapacityRequirement::AvailableBikes);
    assert_eq!(origin.unwrap().address, "A");

    let destination =
        veloplan::select_station(&target, &stations, 3, CapacityRequirement::FreeDocks);
    assert!(destination.is_none());
}
