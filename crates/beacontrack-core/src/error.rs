//! Unified error types for the beacontrack core library.
//!
//! The domain operations are total: identity comparison, sample
//! accumulation, and lookup cannot fail. A lookup miss and a zero-sample
//! average are normal `Option` outcomes, not errors. The fallible surface
//! is the ambient one — configuration and persistence — and is covered by
//! [`BeaconError`].

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for all beacontrack operations.
#[derive(Debug, Error)]
pub enum BeaconError {
    /// The configuration file was not found at the expected path.
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    /// The platform directory for the named purpose could not be determined.
    #[error("Cannot determine {0} directory for this platform")]
    DirectoryUnavailable(&'static str),

    /// An error occurred while persisting or reading beacon data.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for beacontrack operations.
///
/// This type alias eliminates the need to specify the error type explicitly
/// when returning results from beacontrack functions.
pub type Result<T> = std::result::Result<T, BeaconError>;

impl BeaconError {
    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_) | Self::ConfigParse(_) | Self::ConfigValidation(_)
        )
    }

    /// Returns `true` if this error is related to I/O or persistence.
    #[inline]
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Io(_))
    }
}

impl From<serde_json::Error> for BeaconError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<toml::de::Error> for BeaconError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

impl From<toml::ser::Error> for BeaconError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
