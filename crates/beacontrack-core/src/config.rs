//! Application configuration management.
//!
//! Handles loading, saving, and validating beacontrack configuration:
//! - Where the persisted beacon registry lives
//! - The weakest RSSI ingestion should bother recording
//! - An optional allowlist restricting tracking to known hardware addresses

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BeaconError, Result};

/// Colon- or dash-separated 48-bit hardware address, e.g. `AA:BB:CC:DD:EE:FF`.
static MAC_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("valid pattern"));

/// Returns `true` if `address` is a syntactically valid MAC address.
#[must_use]
pub fn is_valid_mac_address(address: &str) -> bool {
    MAC_ADDRESS.is_match(address)
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory the beacon registry snapshot is stored in.
    /// `None` selects the platform default.
    pub data_dir: Option<PathBuf>,

    /// Weakest RSSI worth recording, in dBm. Ingestion layers use this as a
    /// floor to drop noise from the edge of radio range.
    /// Typical values: -90 (permissive) to -60 (close range only).
    pub rssi_floor: i16,

    /// Hardware addresses to track. Empty means track every beacon seen.
    pub device_allowlist: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            rssi_floor: -90,
            device_allowlist: Vec::new(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from the platform default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file cannot be read, parsed, or validated.
    pub fn load() -> Result<Self> {
        Self::load_or_default(Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the file cannot
    /// be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save configuration to the platform default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path()?)
    }

    /// Check the configuration for invalid values.
    ///
    /// # Errors
    ///
    /// Returns `BeaconError::ConfigValidation` describing the first
    /// violation found.
    pub fn validate(&self) -> Result<()> {
        if !(-127..=20).contains(&self.rssi_floor) {
            return Err(BeaconError::ConfigValidation(format!(
                "rssi_floor must be between -127 and 20 dBm (got {})",
                self.rssi_floor
            )));
        }
        for address in &self.device_allowlist {
            if !is_valid_mac_address(address) {
                return Err(BeaconError::ConfigValidation(format!(
                    "invalid device address in allowlist: '{address}'"
                )));
            }
        }
        Ok(())
    }

    /// Whether `device` passes the allowlist. An empty allowlist admits
    /// every device.
    #[must_use]
    pub fn is_device_allowed(&self, device: &str) -> bool {
        self.device_allowlist.is_empty() || self.device_allowlist.iter().any(|d| d == device)
    }

    /// Get the configuration file path.
    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "beacontrack")
            .ok_or(BeaconError::DirectoryUnavailable("config"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
