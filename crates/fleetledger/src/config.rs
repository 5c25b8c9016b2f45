//! Configuration management for fleetledger.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fleetledger";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLEETLEDGER_`)
/// 2. TOML config file at `~/.config/fleetledger/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Rental defaults.
    pub rental: RentalConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the store files.
    /// Defaults to `~/.local/share/fleetledger`
    pub data_dir: Option<PathBuf>,
    /// Vehicle store file name.
    pub vehicles_file: String,
    /// Customer store file name.
    pub customers_file: String,
    /// Rent/return entry store file name.
    pub entries_file: String,
    /// Administrative status change store file name.
    pub status_file: String,
}

/// Defaults applied when a kind-specific vehicle field is left blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalConfig {
    /// Seats for a car when none are given.
    pub default_seats: u32,
    /// Cargo capacity for a pickup truck when none is given.
    pub default_cargo_capacity: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            vehicles_file: "vehicles.txt".to_string(),
            customers_file: "customers.txt".to_string(),
            entries_file: "rental_records.txt".to_string(),
            status_file: "status_changes.txt".to_string(),
        }
    }
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            default_seats: 5,
            default_cargo_capacity: 1000.0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLEETLEDGER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let files = [
            ("vehicles_file", &self.storage.vehicles_file),
            ("customers_file", &self.storage.customers_file),
            ("entries_file", &self.storage.entries_file),
            ("status_file", &self.storage.status_file),
        ];

        let mut seen = HashSet::new();
        for (key, name) in files {
            if name.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must not be empty"),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("{key} '{name}' is used by more than one store"),
                });
            }
        }

        if self.rental.default_seats == 0 {
            return Err(Error::ConfigValidation {
                message: "default_seats must be greater than 0".to_string(),
            });
        }

        let cargo = self.rental.default_cargo_capacity;
        if !cargo.is_finite() || cargo < 0.0 {
            return Err(Error::ConfigValidation {
                message: format!("default_cargo_capacity ({cargo}) must be a non-negative number"),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert!(storage.data_dir.is_none());
        assert_eq!(storage.vehicles_file, "vehicles.txt");
        assert_eq!(storage.customers_file, "customers.txt");
        assert_eq!(storage.entries_file, "rental_records.txt");
        assert_eq!(storage.status_file, "status_changes.txt");
    }

    #[test]
    fn test_default_rental_config() {
        let rental = RentalConfig::default();

        assert_eq!(rental.default_seats, 5);
        assert!((rental.default_cargo_capacity - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_file_name() {
        let mut config = Config::default();
        config.storage.customers_file = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("customers_file"));
    }

    #[test]
    fn test_validate_shared_file_name() {
        let mut config = Config::default();
        config.storage.status_file = "vehicles.txt".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("more than one store"));
    }

    #[test]
    fn test_validate_zero_seats() {
        let mut config = Config::default();
        config.rental.default_seats = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_seats"));
    }

    #[test]
    fn test_validate_negative_cargo() {
        let mut config = Config::default();
        config.rental.default_cargo_capacity = -10.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_cargo_capacity"));

        config.rental.default_cargo_capacity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_data_dir_default() {
        let config = Config::default();
        assert!(config.data_dir().to_string_lossy().contains("fleetledger"));
    }

    #[test]
    fn test_data_dir_custom() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/fleet"));

        assert_eq!(config.data_dir(), PathBuf::from("/srv/fleet"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("fleetledger"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "fleetledger_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[storage]\ndata_dir = \"/srv/fleet\"\n\n[rental]\ndefault_seats = 7\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/fleet"));
        assert_eq!(config.rental.default_seats, 7);
        assert_eq!(config.storage.vehicles_file, "vehicles.txt");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "fleetledger_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[rental]\ndefault_seats = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"entries_file": "ledger.csv"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.entries_file, "ledger.csv");
        assert_eq!(storage.vehicles_file, "vehicles.txt");
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("vehicles_file"));
        assert!(json.contains("default_seats"));
    }
}
