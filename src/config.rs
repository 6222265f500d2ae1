//! Configuration management for the `Veloplan` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::VeloplanError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Veloplan` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeloplanConfig {
    /// Geocoding service configuration
    pub geocoder: GeocoderConfig,
    /// Bike-share station feed configuration
    pub station_feed: StationFeedConfig,
    /// Bike-routing service configuration
    pub routing: RoutingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default application settings
    pub defaults: DefaultsConfig,
}

/// Bounding box biasing geocoding to the metropolitan area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Format as the `min_lon,min_lat,max_lon,max_lat` query value
    #[must_use]
    pub fn as_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Geocoding service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Geocoder API key
    pub api_key: Option<String>,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    /// Bounding box biasing candidates to the metropolitan area
    #[serde(default = "default_bounding_box")]
    pub bounding_box: BoundingBox,
    /// Maximum number of candidates to request
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Station feed configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationFeedConfig {
    /// Base URL of the open-data records endpoint
    #[serde(default = "default_station_feed_base_url")]
    pub base_url: String,
    /// Records per page (the feed caps pages at 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on pages fetched per refresh
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Bike-routing service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL for the routing API
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target city for the geocoding tie-break
    #[serde(default = "default_city")]
    pub city: String,
    /// Venue catalog CSV path
    #[serde(default = "default_venues_file")]
    pub venues_file: String,
    /// Largest party size accepted from the UI
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
}

// Default value functions
fn default_geocoder_base_url() -> String {
    "https://api.opencagedata.com/geocode/v1/json".to_string()
}

fn default_bounding_box() -> BoundingBox {
    // Valencia metropolitan area
    BoundingBox {
        min_lon: -0.460,
        min_lat: 39.405,
        max_lon: -0.290,
        max_lat: 39.530,
    }
}

fn default_candidate_limit() -> u32 {
    5
}

fn default_station_feed_base_url() -> String {
    "https://valencia.opendatasoft.com/api/explore/v2.1/catalog/datasets/valenbisi-disponibilitat-valenbisi-dsiponibilidad/records".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    10
}

fn default_routing_base_url() -> String {
    "http://router.project-osrm.org".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_city() -> String {
    "Valencia".to_string()
}

fn default_venues_file() -> String {
    "v_infociudad.csv".to_string()
}

fn default_max_party_size() -> u32 {
    10
}

impl Default for VeloplanConfig {
    fn default() -> Self {
        Self {
            geocoder: GeocoderConfig {
                api_key: None,
                base_url: default_geocoder_base_url(),
                bounding_box: default_bounding_box(),
                candidate_limit: default_candidate_limit(),
                timeout_seconds: default_timeout(),
                max_retries: default_max_retries(),
            },
            station_feed: StationFeedConfig {
                base_url: default_station_feed_base_url(),
                page_size: default_page_size(),
                max_pages: default_max_pages(),
                timeout_seconds: default_timeout(),
                max_retries: default_max_retries(),
            },
            routing: RoutingConfig {
                base_url: default_routing_base_url(),
                timeout_seconds: default_timeout(),
                max_retries: default_max_retries(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            defaults: DefaultsConfig {
                city: default_city(),
                venues_file: default_venues_file(),
                max_party_size: default_max_party_size(),
            },
        }
    }
}

impl VeloplanConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with VELOPLAN_ prefix
        builder = builder.add_source(
            Environment::with_prefix("VELOPLAN")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: VeloplanConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("veloplan").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_bounding_box()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.geocoder.api_key {
            if api_key.is_empty() {
                return Err(VeloplanError::config(
                    "Geocoder API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(VeloplanError::config(
                    "Geocoder API key appears to be invalid (too short). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("geocoder", self.geocoder.timeout_seconds),
            ("station_feed", self.station_feed.timeout_seconds),
            ("routing", self.routing.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(VeloplanError::config(format!(
                    "{name} timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        for (name, retries) in [
            ("geocoder", self.geocoder.max_retries),
            ("station_feed", self.station_feed.max_retries),
            ("routing", self.routing.max_retries),
        ] {
            if retries > 10 {
                return Err(VeloplanError::config(format!(
                    "{name} max retries cannot exceed 10"
                ))
                .into());
            }
        }

        if self.station_feed.page_size == 0 || self.station_feed.page_size > 100 {
            return Err(
                VeloplanError::config("Station feed page size must be between 1 and 100").into(),
            );
        }

        if self.station_feed.max_pages == 0 {
            return Err(VeloplanError::config("Station feed max pages must be at least 1").into());
        }

        if self.geocoder.candidate_limit == 0 || self.geocoder.candidate_limit > 100 {
            return Err(
                VeloplanError::config("Geocoder candidate limit must be between 1 and 100").into(),
            );
        }

        if self.defaults.max_party_size == 0 {
            return Err(VeloplanError::config("Maximum party size must be at least 1").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(VeloplanError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(VeloplanError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoder", &self.geocoder.base_url),
            ("Station feed", &self.station_feed.base_url),
            ("Routing", &self.routing.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(VeloplanError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate the geocoding bounding box
    fn validate_bounding_box(&self) -> Result<()> {
        let bbox = &self.geocoder.bounding_box;
        if bbox.min_lon >= bbox.max_lon || bbox.min_lat >= bbox.max_lat {
            return Err(VeloplanError::config(
                "Geocoder bounding box must have min_lon < max_lon and min_lat < max_lat",
            )
            .into());
        }
        if !(-90.0..=90.0).contains(&bbox.min_lat)
            || !(-90.0..=90.0).contains(&bbox.max_lat)
            || !(-180.0..=180.0).contains(&bbox.min_lon)
            || !(-180.0..=180.0).contains(&bbox.max_lon)
        {
            return Err(VeloplanError::config(
                "Geocoder bounding box coordinates are out of range",
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VeloplanConfig::default();
        assert_eq!(
            config.geocoder.base_url,
            "https://api.opencagedata.com/geocode/v1/json"
        );
        assert_eq!(config.geocoder.timeout_seconds, 10);
        assert_eq!(config.geocoder.max_retries, 1);
        assert_eq!(config.station_feed.page_size, 100);
        assert_eq!(config.routing.base_url, "http://router.project-osrm.org");
        assert_eq!(config.defaults.city, "Valencia");
        assert_eq!(config.defaults.max_party_size, 10);
        assert!(config.geocoder.api_key.is_none());
    }

    #[test]
    fn test_bounding_box_query_value() {
        let bbox = VeloplanConfig::default().geocoder.bounding_box;
        assert_eq!(bbox.as_query_value(), "-0.46,39.405,-0.29,39.53");
    }

    #[test]
    fn test_config_validation_default_ok() {
        let config = VeloplanConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = VeloplanConfig::default();
        config.geocoder.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = VeloplanConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = VeloplanConfig::default();
        config.routing.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("between 1 and 300"));
    }

    #[test]
    fn test_config_validation_page_size() {
        let mut config = VeloplanConfig::default();
        config.station_feed.page_size = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_inverted_bounding_box() {
        let mut config = VeloplanConfig::default();
        config.geocoder.bounding_box.min_lon = 1.0;
        config.geocoder.bounding_box.max_lon = -1.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("bounding box"));
    }

    #[test]
    fn test_config_path_generation() {
        let path = VeloplanConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("veloplan"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
