//! The beacon entity: identity, accumulated RSSI samples, and aggregates.
//!
//! A [`Beacon`] represents one physical BLE beacon across repeated
//! sightings. Its identity (device address plus ordered identity fields) is
//! fixed at ingestion; every further sighting only appends an RSSI sample
//! and may refresh the auxiliary data fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::{Field, Fields};

/// A BLE beacon: protocol tag, identity fields, auxiliary data, and the
/// RSSI samples accumulated across sightings.
///
/// The sample history is append-only and unbounded; a long-lived beacon
/// accumulates memory proportional to its sightings. Callers needing
/// bounded memory must cap or reset externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beacon {
    kind: String,
    ids: Fields,
    data: Fields,
    power: Field,
    rssis: Vec<i8>,
    device: String,
}

impl Beacon {
    /// Create a new beacon from decoded advertisement fields.
    ///
    /// The sample history starts empty. The device address also starts
    /// empty: it is learned from the radio layer rather than the
    /// advertisement payload, and is attached with [`Beacon::with_device`]
    /// or [`Beacon::set_device`]. Field contents are taken as-is;
    /// well-formed identity fields are the caller's responsibility.
    #[must_use]
    pub fn new(kind: impl Into<String>, ids: Fields, data: Fields, power: Field) -> Self {
        Self {
            kind: kind.into(),
            ids,
            data,
            power,
            rssis: Vec::new(),
            device: String::new(),
        }
    }

    /// Attach the hardware address the advertisement was received from.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Set the hardware address the advertisement was received from.
    pub fn set_device(&mut self, device: impl Into<String>) {
        self.device = device.into();
    }

    /// The protocol/format tag, e.g. `"iBeacon"`. Advisory only; never part
    /// of identity.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The ordered identity fields distinguishing this beacon within its
    /// kind.
    #[must_use]
    pub fn ids(&self) -> &[Field] {
        &self.ids
    }

    /// Auxiliary, non-identifying fields (e.g. temperature, battery).
    #[must_use]
    pub fn data(&self) -> &[Field] {
        &self.data
    }

    /// Mutable access to the auxiliary fields. Later sightings may refresh
    /// them without affecting identity.
    pub fn data_mut(&mut self) -> &mut Fields {
        &mut self.data
    }

    /// The reference transmit-power field used by external RSSI-to-distance
    /// estimation.
    #[must_use]
    pub fn power(&self) -> &Field {
        &self.power
    }

    /// The hardware address of the beacon; empty until assigned.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Record one RSSI measurement, in dBm.
    pub fn add_rssi(&mut self, rssi: i8) {
        self.rssis.push(rssi);
    }

    /// The recorded RSSI samples, in observation order.
    #[must_use]
    pub fn samples(&self) -> &[i8] {
        &self.rssis
    }

    /// Number of RSSI samples recorded so far.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.rssis.len()
    }

    /// Arithmetic mean of all recorded samples, in dBm.
    ///
    /// Returns `None` when no samples have been recorded: an average over
    /// zero observations is undefined, and a finite placeholder would be
    /// misleading.
    #[must_use]
    pub fn average_rssi(&self) -> Option<f64> {
        if self.rssis.is_empty() {
            return None;
        }
        let total: f64 = self.rssis.iter().map(|&rssi| f64::from(rssi)).sum();
        Some(total / self.rssis.len() as f64)
    }

    /// Whether `other` is a sighting of the same physical beacon.
    ///
    /// True iff the device addresses match byte-for-byte (case-sensitive)
    /// and the identity fields match element-wise, in order and length.
    /// `kind`, `data`, `power`, and sample history are excluded: repeated
    /// sightings may carry different auxiliary data and must still be
    /// recognized as the same entity.
    ///
    /// Two beacons whose device addresses are both empty compare equal when
    /// their identity fields match. An unassigned address is the empty
    /// string, not a wildcard: it never matches an assigned one.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.device == other.device && self.ids == other.ids
    }
}

impl fmt::Display for Beacon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = self
            .ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{} - {}: {}, rssi: ", self.device, self.kind, ids)?;
        match self.average_rssi() {
            Some(avg) => write!(f, "{avg:.2}")?,
            None => f.write_str("n/a")?,
        }
        write!(f, ", scans: {}", self.rssis.len())
    }
}
