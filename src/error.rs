//! Error types and handling for chargelog
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for chargelog operations
pub type Result<T> = std::result::Result<T, ChargelogError>;

/// Main error type for chargelog
#[derive(Debug, Error)]
pub enum ChargelogError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Transport-level HTTP errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// A vendor API read that produced no usable value
    #[error("Fetch failed ({source_name}): {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    /// SQLite store errors
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// CSV export errors
    #[error("Export error: {message}")]
    Export { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl ChargelogError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ChargelogError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ChargelogError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        ChargelogError::Io {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        ChargelogError::Network {
            message: message.into(),
        }
    }

    /// Create a new fetch error for the named reading source
    pub fn fetch<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        ChargelogError::Fetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        ChargelogError::Persistence {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        ChargelogError::Export {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        ChargelogError::Generic {
            message: message.into(),
        }
    }

    /// Whether this error means a storage write was lost
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            ChargelogError::Persistence { .. } | ChargelogError::Export { .. }
        )
    }
}

impl From<std::io::Error> for ChargelogError {
    fn from(err: std::io::Error) -> Self {
        ChargelogError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ChargelogError {
    fn from(err: serde_yaml::Error) -> Self {
        ChargelogError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ChargelogError {
    fn from(err: serde_json::Error) -> Self {
        ChargelogError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ChargelogError {
    fn from(err: reqwest::Error) -> Self {
        ChargelogError::network(err.to_string())
    }
}

impl From<rusqlite::Error> for ChargelogError {
    fn from(err: rusqlite::Error) -> Self {
        ChargelogError::persistence(err.to_string())
    }
}

impl From<csv::Error> for ChargelogError {
    fn from(err: csv::Error) -> Self {
        ChargelogError::export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ChargelogError::config("test config error");
        assert!(matches!(err, ChargelogError::Config { .. }));

        let err = ChargelogError::fetch("energy", "HTTP 503");
        assert!(matches!(err, ChargelogError::Fetch { .. }));

        let err = ChargelogError::validation("field", "test validation error");
        assert!(matches!(err, ChargelogError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ChargelogError::config("test error");
        assert_eq!(format!("{}", err), "Configuration error: test error");

        let err = ChargelogError::fetch("mileage", "HTTP 401");
        assert_eq!(format!("{}", err), "Fetch failed (mileage): HTTP 401");
    }

    #[test]
    fn test_persistence_classification() {
        assert!(ChargelogError::persistence("disk full").is_persistence_failure());
        assert!(ChargelogError::export("denied").is_persistence_failure());
        assert!(!ChargelogError::fetch("energy", "timeout").is_persistence_failure());
    }

    #[test]
    fn test_sqlite_error_maps_to_persistence() {
        let err: ChargelogError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, ChargelogError::Persistence { .. }));
    }
}
