//! Geocoding adapter
//!
//! Resolves a free-text address into a coordinate, biased to the
//! configured metropolitan bounding box. Candidates whose city, town,
//! or municipality component matches the target city are preferred
//! over the service's own ranking.

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::{debug, warn};

use crate::config::{BoundingBox, GeocoderConfig};
use crate::error::VeloplanError;
use crate::models::Coordinate;
use crate::Result;

/// Narrow interface over the geocoding service, so the route composer
/// stays testable without network access.
#[async_trait]
pub trait Geocode: Send + Sync {
    /// Resolve a free-text address. `Ok(None)` means the service
    /// answered but produced no usable candidate.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>>;
}

/// OpenCage geocoding API client
pub struct OpenCageClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    bounding_box: BoundingBox,
    candidate_limit: u32,
    target_city: String,
}

impl OpenCageClient {
    /// Create a new client from configuration.
    ///
    /// `target_city` drives the candidate tie-break.
    pub fn new(config: &GeocoderConfig, target_city: &str) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| VeloplanError::config("Geocoder API key is required"))?;

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
            api_key,
            base_url: config.base_url.clone(),
            bounding_box: config.bounding_box.clone(),
            candidate_limit: config.candidate_limit,
            target_city: target_city.to_string(),
        })
    }
}

#[async_trait]
impl Geocode for OpenCageClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        debug!("Geocoding address: {}", address);

        let url = format!(
            "{}?q={}&bounds={}&limit={}&no_annotations=1&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.bounding_box.as_query_value(),
            self.candidate_limit,
            self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VeloplanError::api(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Geocoding service returned {}", status);
            return Err(VeloplanError::api(format!(
                "Geocoding service error: {status}"
            )));
        }

        let geocode_response: opencage::GeocodeResponse = response
            .json()
            .await
            .map_err(|e| VeloplanError::api(format!("Failed to parse geocoding response: {e}")))?;

        let chosen = pick_candidate(&geocode_response.results, &self.target_city);
        match chosen {
            Some(candidate) => {
                debug!(
                    "Geocoded '{}' to ({:.4}, {:.4})",
                    address, candidate.geometry.lat, candidate.geometry.lng
                );
                Ok(Some(Coordinate::new(
                    candidate.geometry.lat,
                    candidate.geometry.lng,
                )))
            }
            None => {
                debug!("No geocoding candidates for '{}'", address);
                Ok(None)
            }
        }
    }
}

/// Pick the best geocoding candidate: the first whose administrative
/// component matches the target city case-insensitively, otherwise the
/// service's top-ranked result.
fn pick_candidate<'a>(
    results: &'a [opencage::Candidate],
    target_city: &str,
) -> Option<&'a opencage::Candidate> {
    results
        .iter()
        .find(|candidate| candidate.components.matches_city(target_city))
        .or_else(|| results.first())
}

/// `OpenCage` API response structures
mod opencage {
    use serde::Deserialize;

    /// Geocoding response from `OpenCage`
    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        #[serde(default)]
        pub results: Vec<Candidate>,
    }

    /// One ranked geocoding candidate
    #[derive(Debug, Deserialize)]
    pub struct Candidate {
        pub geometry: Geometry,
        #[serde(default)]
        pub components: Components,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub lat: f64,
        pub lng: f64,
    }

    /// Administrative components of a candidate; only the fields used
    /// by the city tie-break are kept.
    #[derive(Debug, Deserialize, Default)]
    pub struct Components {
        pub city: Option<String>,
        pub town: Option<String>,
        pub municipality: Option<String>,
    }

    impl Components {
        /// True if any administrative component names the target city
        pub fn matches_city(&self, target: &str) -> bool {
            [&self.city, &self.town, &self.municipality]
                .into_iter()
                .flatten()
                .any(|name| name.eq_ignore_ascii_case(target))
        }
    }
}
