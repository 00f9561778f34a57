//! Configuration management for chargelog
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files. The file location can be overridden with the
//! `CHARGELOG_CONFIG` environment variable.

use crate::error::{ChargelogError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "CHARGELOG_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What the process does when started
    pub mode: RunMode,

    /// Delay between two energy polls in seconds
    pub poll_interval_seconds: u64,

    /// HTTP client settings shared by both reading sources
    pub http: HttpConfig,

    /// Wallbox / charger API
    pub charger: ChargerConfig,

    /// Vehicle telematics API
    pub vehicle: VehicleConfig,

    /// SQLite store and CSV export locations
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Process run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Long-running session monitor
    Monitor,
    /// Read odometer and energy once, store the pair and exit
    Snapshot,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// User-Agent header sent with each request
    pub user_agent: String,
}

/// Known wallbox APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargerProvider {
    /// Viessmann IoT feature endpoint (`properties.totalEnergy.value`)
    Viessmann,
    /// Easee charger endpoint (`totalKwh`)
    Easee,
    /// Any other API; requires `value_pointer`
    Custom,
}

/// Wallbox API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargerConfig {
    /// Which vendor payload layout to expect
    pub provider: ChargerProvider,

    /// URL template; `{installation_id}`, `{gateway_id}`, `{device_id}`,
    /// `{site_id}` and `{charger_id}` are substituted
    pub endpoint: String,

    /// Bearer token, sent only when non-empty
    pub auth_token: String,

    /// Viessmann installation id
    pub installation_id: String,

    /// Viessmann gateway serial
    pub gateway_id: String,

    /// Viessmann device id
    pub device_id: String,

    /// Easee site id
    pub site_id: String,

    /// Easee charger id
    pub charger_id: String,

    /// JSON pointer overriding the provider default
    pub value_pointer: Option<String>,
}

/// Known vehicle APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleProvider {
    /// BMW vehicle status endpoint (`mileage`)
    Bmw,
    /// Mercedes-Benz vehicle data endpoint (`odometer`)
    Mercedes,
    /// Any other API; requires `value_pointer`
    Custom,
}

/// Vehicle API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Which vendor payload layout to expect
    pub provider: VehicleProvider,

    /// URL template; `{vehicle_id}` is substituted
    pub endpoint: String,

    /// Bearer token for the telematics API
    pub auth_token: String,

    /// Vehicle identifier
    pub vehicle_id: String,

    /// JSON pointer overriding the provider default
    pub value_pointer: Option<String>,
}

/// How completed sessions are mirrored to CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Rewrite `export_path` from the whole table after every insert
    Full,
    /// Append one row to `export_dir/charging_data_<date>.csv`
    Daily,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: String,

    /// Export strategy
    pub export_mode: ExportMode,

    /// Target file for full exports
    pub export_path: String,

    /// Directory for per-day export files
    pub export_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (its parent directory receives the rolling files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the environment override or default locations
    pub fn load() -> Result<Self> {
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::from_file(explicit);
        }

        let default_paths = [
            "chargelog_config.yaml",
            "/data/chargelog_config.yaml",
            "/etc/chargelog/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_seconds == 0 {
            return Err(ChargelogError::validation(
                "poll_interval_seconds",
                "Must be greater than 0",
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(ChargelogError::validation(
                "http.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        if self.charger.endpoint.trim().is_empty() {
            return Err(ChargelogError::validation(
                "charger.endpoint",
                "Endpoint cannot be empty",
            ));
        }

        if self.charger.provider == ChargerProvider::Custom
            && self.charger.value_pointer.is_none()
        {
            return Err(ChargelogError::validation(
                "charger.value_pointer",
                "Required for the custom provider",
            ));
        }

        if self.vehicle.endpoint.trim().is_empty() {
            return Err(ChargelogError::validation(
                "vehicle.endpoint",
                "Endpoint cannot be empty",
            ));
        }

        if self.vehicle.provider == VehicleProvider::Custom
            && self.vehicle.value_pointer.is_none()
        {
            return Err(ChargelogError::validation(
                "vehicle.value_pointer",
                "Required for the custom provider",
            ));
        }

        for (field, pointer) in [
            ("charger.value_pointer", &self.charger.value_pointer),
            ("vehicle.value_pointer", &self.vehicle.value_pointer),
        ] {
            if let Some(p) = pointer
                && !p.is_empty()
                && !p.starts_with('/')
            {
                return Err(ChargelogError::validation(
                    field,
                    "JSON pointer must start with '/'",
                ));
            }
        }

        if self.storage.database_path.trim().is_empty() {
            return Err(ChargelogError::validation(
                "storage.database_path",
                "Path cannot be empty",
            ));
        }

        match self.storage.export_mode {
            ExportMode::Full if self.storage.export_path.trim().is_empty() => {
                return Err(ChargelogError::validation(
                    "storage.export_path",
                    "Path cannot be empty in full export mode",
                ));
            }
            ExportMode::Daily if self.storage.export_dir.trim().is_empty() => {
                return Err(ChargelogError::validation(
                    "storage.export_dir",
                    "Directory cannot be empty in daily export mode",
                ));
            }
            _ => {}
        }

        crate::logging::parse_log_level(&self.logging.level)
            .map_err(|_| ChargelogError::validation("logging.level", "Unknown log level"))?;

        Ok(())
    }
}
