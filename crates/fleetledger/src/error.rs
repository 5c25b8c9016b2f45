//! Error types for fleetledger.
//!
//! Only input-shape faults and storage faults are errors. A rejected rental,
//! a duplicate key or an unknown vehicle are ordinary outcomes and are reported
//! through `Ok(false)` by the ledger operations instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::plate::PlateError;

/// The main error type for fleetledger operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A license plate failed validation.
    #[error("invalid license plate: {0}")]
    InvalidPlate(#[from] PlateError),

    /// A user-supplied field could not be accepted.
    #[error("invalid {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// A vehicle was handed to the ledger before its plate was set.
    #[error("vehicle has no license plate")]
    MissingPlate,

    // === Storage Errors ===
    /// A durable store exists but could not be read.
    #[error("failed to read store {path}: {source}")]
    StoreRead {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be appended to a durable store.
    #[error("failed to append to store {path}: {source}")]
    StoreWrite {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A store line could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for fleetledger operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Create a malformed record error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }

    /// Check if this error is an input-shape fault the user can correct.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPlate(_) | Self::InvalidField { .. } | Self::MissingPlate
        )
    }

    /// Check if this error came from the durable stores.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StoreRead { .. }
                | Self::StoreWrite { .. }
                | Self::MalformedRecord(_)
                | Self::DirectoryCreate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_display() {
        let err = Error::invalid_field("year", "not a number");
        assert_eq!(err.to_string(), "invalid year: not a number");
    }

    #[test]
    fn test_invalid_plate_display() {
        let err: Error = PlateError::TooLong { len: 7 }.into();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid license plate"));
        assert!(msg.contains("too long"));
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::MissingPlate.is_validation());
        assert!(Error::invalid_field("amount", "negative").is_validation());
        assert!(Error::InvalidPlate(PlateError::Empty).is_validation());
        assert!(!Error::ConfigValidation {
            message: "x".to_string()
        }
        .is_validation());
    }

    #[test]
    fn test_is_storage() {
        let err = Error::StoreWrite {
            path: PathBuf::from("/tmp/vehicles.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_storage());
        assert!(!err.is_validation());
        assert!(!Error::MissingPlate.is_storage());
    }

    #[test]
    fn test_store_write_display() {
        let err = Error::StoreWrite {
            path: PathBuf::from("/data/rental_records.txt"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/rental_records.txt"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_malformed_record() {
        let err = Error::malformed("expected 5 fields, found 3");
        assert_eq!(err.to_string(), "malformed record: expected 5 fields, found 3");
        assert!(err.is_storage());
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "default_seats must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("default_seats"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
