//! Bike-routing adapter
//!
//! Calls an OSRM-style routing service for the cyclable path between
//! two station coordinates. Any non-success response, transport error,
//! or empty route set surfaces as `RoutingUnavailable`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::debug;

use crate::config::RoutingConfig;
use crate::error::VeloplanError;
use crate::models::{BikeRoute, Coordinate};
use crate::Result;

/// Narrow interface over the bike-routing service
#[async_trait]
pub trait BikeRouting: Send + Sync {
    /// Compute the cyclable route between two coordinates
    async fn route(&self, start: &Coordinate, end: &Coordinate) -> Result<BikeRoute>;
}

/// OSRM routing API client
pub struct OsrmClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OsrmClient {
    /// Create a new client from configuration
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("veloplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VeloplanError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = reqwest_middleware::ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl BikeRouting for OsrmClient {
    async fn route(&self, start: &Coordinate, end: &Coordinate) -> Result<BikeRoute> {
        debug!(
            "Requesting bike route ({}) -> ({})",
            start.format_coordinates(),
            end.format_coordinates()
        );

        // OSRM takes lon,lat pairs
        let url = format!(
            "{}/route/v1/bike/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, start.longitude, start.latitude, end.longitude, end.latitude
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            VeloplanError::routing_unavailable(format!("Routing request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(VeloplanError::routing_unavailable(format!(
                "Routing service returned {}",
                response.status()
            )));
        }

        let route_response: osrm::RouteResponse = response.json().await.map_err(|e| {
            VeloplanError::routing_unavailable(format!("Failed to parse routing response: {e}"))
        })?;

        route_response
            .routes
            .into_iter()
            .next()
            .map(BikeRoute::from)
            .ok_or_else(|| VeloplanError::routing_unavailable("No routes in response"))
    }
}

/// `OSRM` API response structures and conversion utilities
mod osrm {
    use serde::Deserialize;

    use crate::models::{BikeRoute, Coordinate};

    #[derive(Debug, Deserialize)]
    pub struct RouteResponse {
        #[serde(default)]
        pub routes: Vec<Route>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Route {
        pub geometry: Geometry,
        /// Total distance in meters
        pub distance: f64,
        /// Total duration in seconds
        pub duration: f64,
    }

    /// GeoJSON LineString geometry; coordinates are [lon, lat] pairs
    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub coordinates: Vec<[f64; 2]>,
    }

    impl From<Route> for BikeRoute {
        fn from(route: Route) -> Self {
            Self {
                path: route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect(),
                distance_km: route.distance / 1000.0,
                duration_min: route.duration / 60.0,
            }
        }
    }
}
