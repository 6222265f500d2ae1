//! Bike-share station feed loader
//!
//! Fetches the live station inventory from an Opendatasoft-style
//! paginated records endpoint and flattens it into a uniform station
//! table. Any page failure aborts the whole refresh; the planner must
//! never run against a silently partial inventory.

use std::time::Duration;

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::{debug, info};

use crate::config::StationFeedConfig;
use crate::error::VeloplanError;
use crate::models::{Coordinate, Station};
use crate::Result;

/// Client for the public bike-share availability feed
pub struct StationFeedClient {
    client: ClientWithMiddleware,
    base_url: String,
    page_size: u32,
    max_pages: u32,
}

impl StationFeedClient {
    /// Create a new client from configuration
    pub fn new(config: &StationFeedConfig) -> Result<Self> {
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
            page_size: config.page_size,
            max_pages: config.max_pages,
        })
    }

    /// Fetch the full station inventory, page by page.
    ///
    /// Stops after a short page (the feed is exhausted) or after
    /// `max_pages`. Records missing a coordinate, count, or address are
    /// dropped during flattening.
    pub async fn fetch_stations(&self) -> Result<Vec<Station>> {
        let mut records = Vec::new();

        for page in 0..self.max_pages {
            let offset = page * self.page_size;
            let url = format!(
                "{}?limit={}&offset={}",
                self.base_url, self.page_size, offset
            );
            debug!("Fetching station feed page at offset {}", offset);

            let response = self.client.get(&url).send().await.map_err(|e| {
                VeloplanError::feed_unavailable(format!(
                    "Station feed request failed (offset={offset}): {e}"
                ))
            })?;

            if !response.status().is_success() {
                return Err(VeloplanError::feed_unavailable(format!(
                    "Station feed returned {} (offset={offset})",
                    response.status()
                )));
            }

            let page_data: feed::RecordsPage = response.json().await.map_err(|e| {
                VeloplanError::feed_unavailable(format!(
                    "Failed to parse station feed page (offset={offset}): {e}"
                ))
            })?;

            let page_len = page_data.results.len();
            records.extend(page_data.results);

            if page_len < self.page_size as usize {
                break;
            }
        }

        let stations = flatten_records(records);
        info!("Loaded {} stations from the live feed", stations.len());
        Ok(stations)
    }
}

/// Flatten raw feed records into stations, dropping incomplete rows
fn flatten_records(records: Vec<feed::StationRecord>) -> Vec<Station> {
    records
        .into_iter()
        .filter_map(|record| {
            let geo = record.geo_point_2d?;
            Some(Station {
                address: record.address?,
                coordinate: Coordinate::new(geo.lat, geo.lon),
                bikes_available: record.available?,
                docks_free: record.free?,
            })
        })
        .collect()
}

/// Opendatasoft explore v2.1 response structures
mod feed {
    use serde::Deserialize;

    /// One page of the `records` endpoint
    #[derive(Debug, Deserialize)]
    pub struct RecordsPage {
        #[serde(default)]
        pub results: Vec<StationRecord>,
    }

    /// A raw station record; every field the feed can omit is optional
    #[derive(Debug, Deserialize)]
    pub struct StationRecord {
        pub geo_point_2d: Option<GeoPoint>,
        pub available: Option<u32>,
        pub free: Option<u32>,
        pub address: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeoPoint {
        pub lat: f64,
        pub lon: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::feed::{GeoPoint, StationRecord};
    use super::*;

    fn record(
        geo: Option<(f64, f64)>,
        available: Option<u32>,
        free: Option<u32>,
        address: Option<&str>,
    ) -> StationRecord {
        StationRecord {
            geo_point_2d: geo.map(|(lat, lon)| GeoPoint { lat, lon }),
            available,
            free,
            address: address.map(String::from),
        }
    }

    #[test]
    fn test_flatten_keeps_complete_records() {
        let records = vec![
            record(Some((39.47, -0.37)), Some(5), Some(10), Some("Calle Colon")),
            record(Some((39.48, -0.38)), Some(0), Some(20), Some("Plaza Ayuntamiento")),
        ];
        let stations = flatten_records(records);
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].address, "Calle Colon");
        assert_eq!(stations[0].bikes_available, 5);
        assert_eq!(stations[1].docks_free, 20);
    }

    #[test]
    fn test_flatten_drops_incomplete_records() {
        let records = vec![
            record(None, Some(5), Some(10), Some("No coordinates")),
            record(Some((39.47, -0.37)), None, Some(10), Some("No bike count")),
            record(Some((39.47, -0.37)), Some(5), None, Some("No dock count")),
            record(Some((39.47, -0.37)), Some(5), Some(10), None),
            record(Some((39.49, -0.39)), Some(1), Some(1), Some("Complete")),
        ];
        let stations = flatten_records(records);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].address, "Complete");
    }

    #[test]
    fn test_flatten_empty_input() {
        assert!(flatten_records(vec![]).is_empty());
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{
            "geo_point_2d": {"lat": 39.4699, "lon": -0.3763},
            "available": 7,
            "free": 13,
            "address": "Xativa, 24"
        }"#;
        let record: StationRecord = serde_json::from_str(json).unwrap();
        let stations = flatten_records(vec![record]);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].coordinate.latitude, 39.4699);
        assert_eq!(stations[0].bikes_available, 7);
    }

    #[test]
    fn test_record_deserialization_with_nulls() {
        let json = r#"{
            "geo_point_2d": null,
            "available": null,
            "free": 13,
            "address": "Broken row"
        }"#;
        let record: StationRecord = serde_json::from_str(json).unwrap();
        assert!(flatten_records(vec![record]).is_empty());
    }
}
