//! Persistent storage for observed beacons.
//!
//! Snapshots the beacon registry to a JSON file so accumulated sample
//! history survives restarts.

use std::path::PathBuf;

use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::{BeaconError, Result};
use crate::registry::BeaconRegistry;

/// Storage backend for beacontrack data.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a new storage instance rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Storage at the location selected by `config`, falling back to the
    /// platform default when the config does not override it.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the platform data
    /// directory cannot be determined.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => Ok(Self::new(dir.clone())),
            None => Self::default_location(),
        }
    }

    /// Storage at the platform default data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be
    /// determined.
    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "beacontrack")
            .ok_or(BeaconError::DirectoryUnavailable("data"))?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Load the persisted registry, or an empty one when no snapshot
    /// exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or
    /// parsed.
    pub fn load_registry(&self) -> Result<BeaconRegistry> {
        let path = self.registry_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let registry: BeaconRegistry = serde_json::from_str(&content)?;
            debug!(path = %path.display(), beacons = registry.len(), "loaded beacon registry");
            Ok(registry)
        } else {
            Ok(BeaconRegistry::new())
        }
    }

    /// Persist a snapshot of `registry`, creating the data directory as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save_registry(&self, registry: &BeaconRegistry) -> Result<()> {
        let path = self.registry_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(registry)?;
        std::fs::write(&path, content)?;
        debug!(path = %path.display(), beacons = registry.len(), "saved beacon registry");
        Ok(())
    }

    fn registry_path(&self) -> PathBuf {
        self.data_dir.join("beacons.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::Beacon;
    use crate::field::Field;
    use tempfile::tempdir;

    fn sample_registry() -> BeaconRegistry {
        let mut registry = BeaconRegistry::new();
        let beacon = Beacon::new(
            "iBeacon",
            vec![Field::Number(1), Field::Number(2)],
            vec![Field::Text("battery=81%".into())],
            Field::Number(-59),
        )
        .with_device("AA:BB:CC:DD:EE:FF");
        registry.record(beacon, -70);
        registry.record(
            Beacon::new(
                "iBeacon",
                vec![Field::Number(1), Field::Number(2)],
                Vec::new(),
                Field::Number(-59),
            )
            .with_device("AA:BB:CC:DD:EE:FF"),
            -72,
        );
        registry
    }

    #[test]
    fn load_without_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let registry = storage.load_registry().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn save_and_load_round_trip_preserves_history() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        storage.save_registry(&sample_registry()).unwrap();
        let loaded = storage.load_registry().unwrap();

        assert_eq!(loaded.len(), 1);
        let beacon = loaded.get(0).unwrap();
        assert_eq!(beacon.device(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(beacon.kind(), "iBeacon");
        assert_eq!(beacon.ids(), &[Field::Number(1), Field::Number(2)]);
        assert_eq!(beacon.samples(), &[-70, -72]);
    }

    #[test]
    fn loaded_registry_keeps_merging_sightings() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.save_registry(&sample_registry()).unwrap();

        let mut loaded = storage.load_registry().unwrap();
        loaded.record(
            Beacon::new(
                "iBeacon",
                vec![Field::Number(1), Field::Number(2)],
                Vec::new(),
                Field::Number(-59),
            )
            .with_device("AA:BB:CC:DD:EE:FF"),
            -68,
        );

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(0).unwrap().sample_count(), 3);
    }

    #[test]
    fn from_config_honors_the_override() {
        let dir = tempdir().unwrap();
        let config = TrackerConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..TrackerConfig::default()
        };

        let storage = Storage::from_config(&config).unwrap();
        storage.save_registry(&sample_registry()).unwrap();
        assert!(dir.path().join("beacons.json").exists());
    }
}
