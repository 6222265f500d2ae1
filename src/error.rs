//! Error types and handling for the `Veloplan` application

use thiserror::Error;

/// Main error type for the `Veloplan` application.
///
/// The trip-planning variants (`AddressNotFound`, `NoFeasibleOrigin`,
/// `NoFeasibleDestination`, `RoutingUnavailable`, `FeedUnavailable`)
/// are expected, user-recoverable outcomes, not crashes.
#[derive(Error, Debug)]
pub enum VeloplanError {
    /// Geocoding produced no usable candidate for the given address
    #[error("Address not found: {address}")]
    AddressNotFound { address: String },

    /// No station has enough available bikes for the party
    #[error("No station with at least {party_size} available bike(s)")]
    NoFeasibleOrigin { party_size: u32 },

    /// No station has enough free docks for the party
    #[error("No station with at least {party_size} free dock(s)")]
    NoFeasibleDestination { party_size: u32 },

    /// The routing service failed or returned no route
    #[error("Bike routing unavailable: {message}")]
    RoutingUnavailable { message: String },

    /// The station inventory could not be fetched
    #[error("Station feed unavailable: {message}")]
    FeedUnavailable { message: String },

    /// Venue catalog errors (missing file, malformed rows, unknown name)
    #[error("Venue catalog error: {message}")]
    Catalog { message: String },

    /// Remote API communication errors outside the trip taxonomy
    #[error("API error: {message}")]
    Api { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl VeloplanError {
    /// Create a new routing-unavailable error
    pub fn routing_unavailable<S: Into<String>>(message: S) -> Self {
        Self::RoutingUnavailable {
            message: message.into(),
        }
    }

    /// Create a new feed-unavailable error
    pub fn feed_unavailable<S: Into<String>>(message: S) -> Self {
        Self::FeedUnavailable {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            VeloplanError::AddressNotFound { address } => {
                format!("Address not found: '{address}'. Try a more specific street address.")
            }
            VeloplanError::NoFeasibleOrigin { party_size } => format!(
                "No nearby station has {party_size} bike(s) available right now. \
                 Try a smaller party or a different start address."
            ),
            VeloplanError::NoFeasibleDestination { party_size } => format!(
                "No station near the venue has {party_size} free dock(s) right now. \
                 Try a smaller party or a different venue."
            ),
            VeloplanError::RoutingUnavailable { .. } => {
                "The bike routing service is unavailable. Please try again later.".to_string()
            }
            VeloplanError::FeedUnavailable { .. } => {
                "The bike-share station feed could not be fetched. Please try again later."
                    .to_string()
            }
            VeloplanError::Catalog { message } => {
                format!("Venue catalog problem: {message}")
            }
            VeloplanError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            VeloplanError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            VeloplanError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            VeloplanError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = VeloplanError::config("missing API key");
        assert!(matches!(config_err, VeloplanError::Config { .. }));

        let routing_err = VeloplanError::routing_unavailable("timeout");
        assert!(matches!(
            routing_err,
            VeloplanError::RoutingUnavailable { .. }
        ));

        let feed_err = VeloplanError::feed_unavailable("HTTP 500");
        assert!(matches!(feed_err, VeloplanError::FeedUnavailable { .. }));
    }

    #[test]
    fn test_user_messages() {
        let err = VeloplanError::AddressNotFound {
            address: "Calle Inventada".to_string(),
        };
        assert!(err.user_message().contains("Calle Inventada"));

        let err = VeloplanError::NoFeasibleOrigin { party_size: 4 };
        assert!(err.user_message().contains("4 bike(s)"));

        let err = VeloplanError::NoFeasibleDestination { party_size: 2 };
        assert!(err.user_message().contains("free dock(s)"));

        let err = VeloplanError::validation("party size must be at least 1");
        assert!(err
            .user_message()
            .contains("party size must be at least 1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VeloplanError = io_err.into();
        assert!(matches!(err, VeloplanError::Io { .. }));
    }
}
