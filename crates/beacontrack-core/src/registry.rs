//! An insertion-ordered collection of observed beacons.
//!
//! The registry is the deduplication point for sightings: ingestion code
//! looks a candidate up by identity with [`BeaconRegistry::find_match`] and
//! appends to the stored beacon on a hit instead of inserting a duplicate.
//! Lookup is a linear scan, which is adequate for the tens to low hundreds
//! of beacons tracked at once.
//!
//! The registry does no locking and assumes single-threaded access. With
//! concurrent ingestion paths, the whole lookup-then-append sequence must
//! sit inside one critical section per registry, or two sightings of the
//! same new beacon can race and create duplicate entries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::beacon::Beacon;

/// Insertion-ordered collection of beacons, one entry per physical device.
///
/// Uniqueness is not enforced by the collection itself; callers keep it
/// unique by looking up before inserting. Should duplicate-identity entries
/// exist anyway, lookups return the earliest-inserted match.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BeaconRegistry {
    beacons: Vec<Beacon>,
}

impl BeaconRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first stored beacon that is a sighting of the same physical
    /// device as `candidate`.
    ///
    /// Scans in insertion order; the earliest match wins. `None` means the
    /// candidate has not been seen before, which is a normal outcome, not a
    /// failure.
    #[must_use]
    pub fn find_match(&self, candidate: &Beacon) -> Option<&Beacon> {
        self.beacons.iter().find(|b| b.same_identity(candidate))
    }

    /// Mutable variant of [`BeaconRegistry::find_match`], for appending
    /// samples to the registry's authoritative copy of a matched beacon.
    pub fn find_match_mut(&mut self, candidate: &Beacon) -> Option<&mut Beacon> {
        self.beacons.iter_mut().find(|b| b.same_identity(candidate))
    }

    /// Append a beacon to the registry.
    pub fn insert(&mut self, beacon: Beacon) {
        self.beacons.push(beacon);
    }

    /// Record a sighting: merge the RSSI sample into the matching stored
    /// beacon, or insert `candidate` as a new entry carrying the sample.
    ///
    /// This packages the "find, then append on hit or insert on miss"
    /// control flow in one call.
    pub fn record(&mut self, candidate: Beacon, rssi: i8) {
        match self
            .beacons
            .iter()
            .position(|b| b.same_identity(&candidate))
        {
            Some(index) => {
                debug!(
                    device = candidate.device(),
                    rssi, "merged sighting into known beacon"
                );
                self.beacons[index].add_rssi(rssi);
            }
            None => {
                debug!(
                    device = candidate.device(),
                    kind = candidate.kind(),
                    "tracking new beacon"
                );
                let mut beacon = candidate;
                beacon.add_rssi(rssi);
                self.beacons.push(beacon);
            }
        }
    }

    /// Number of beacons tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    /// Whether the registry holds no beacons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    /// Iterate over the beacons in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Beacon> {
        self.beacons.iter()
    }

    /// The beacon at `index`, in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Beacon> {
        self.beacons.get(index)
    }
}

impl<'a> IntoIterator for &'a BeaconRegistry {
    type Item = &'a Beacon;
    type IntoIter = std::slice::Iter<'a, Beacon>;

    fn into_iter(self) -> Self::IntoIter {
        self.beacons.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    fn beacon(device: &str, ids: Vec<Field>) -> Beacon {
        Beacon::new("iBeacon", ids, Vec::new(), Field::Number(-59)).with_device(device)
    }

    #[test]
    fn find_match_on_empty_registry_is_none() {
        let registry = BeaconRegistry::new();
        let candidate = beacon("AA:BB", vec![Field::Number(1)]);
        assert!(registry.find_match(&candidate).is_none());
    }

    #[test]
    fn find_match_selects_by_identity_not_position() {
        let mut registry = BeaconRegistry::new();
        registry.insert(beacon("AA:BB", vec![Field::Number(1)]));
        registry.insert(beacon("CC:DD", vec![Field::Number(1)]));

        let candidate = beacon("CC:DD", vec![Field::Number(1)]);
        let found = registry.find_match(&candidate).unwrap();
        assert_eq!(found.device(), "CC:DD");
    }

    #[test]
    fn first_inserted_match_wins_among_duplicates() {
        let mut registry = BeaconRegistry::new();
        let first = Beacon::new("iBeacon", vec![Field::Number(1)], Vec::new(), Field::Number(0))
            .with_device("AA:BB");
        let second = Beacon::new("AltBeacon", vec![Field::Number(1)], Vec::new(), Field::Number(0))
            .with_device("AA:BB");
        registry.insert(first);
        registry.insert(second);

        let candidate = beacon("AA:BB", vec![Field::Number(1)]);
        assert_eq!(registry.find_match(&candidate).unwrap().kind(), "iBeacon");
    }

    #[test]
    fn record_inserts_unknown_beacon_with_its_sample() {
        let mut registry = BeaconRegistry::new();
        registry.record(beacon("AA:BB", vec![Field::Number(1)]), -70);

        assert_eq!(registry.len(), 1);
        let stored = registry.get(0).unwrap();
        assert_eq!(stored.sample_count(), 1);
        assert_eq!(stored.samples(), &[-70]);
    }

    #[test]
    fn record_merges_repeat_sightings() {
        let mut registry = BeaconRegistry::new();
        for rssi in [-70, -72, -68] {
            registry.record(beacon("AA:11", vec![Field::Number(1)]), rssi);
        }

        assert_eq!(registry.len(), 1);
        let stored = registry.get(0).unwrap();
        assert_eq!(stored.sample_count(), 3);
        assert!((stored.average_rssi().unwrap() - (-70.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn record_merges_despite_differing_auxiliary_data() {
        let mut registry = BeaconRegistry::new();
        registry.record(beacon("AA:11", vec![Field::Number(1)]), -70);

        let second_sighting = Beacon::new(
            "iBeacon",
            vec![Field::Number(1)],
            vec![Field::Text("battery=80%".into())],
            Field::Number(-59),
        )
        .with_device("AA:11");
        registry.record(second_sighting, -72);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().sample_count(), 2);
    }

    #[test]
    fn find_match_mut_appends_to_the_stored_copy() {
        let mut registry = BeaconRegistry::new();
        registry.insert(beacon("AA:BB", vec![Field::Number(1)]));

        let candidate = beacon("AA:BB", vec![Field::Number(1)]);
        registry.find_match_mut(&candidate).unwrap().add_rssi(-64);

        assert_eq!(registry.get(0).unwrap().samples(), &[-64]);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut registry = BeaconRegistry::new();
        registry.insert(beacon("AA:BB", vec![Field::Number(1)]));
        registry.insert(beacon("CC:DD", vec![Field::Number(2)]));

        let devices: Vec<&str> = registry.iter().map(Beacon::device).collect();
        assert_eq!(devices, ["AA:BB", "CC:DD"]);
    }
}
