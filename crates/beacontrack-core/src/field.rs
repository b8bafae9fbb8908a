//! Identity and data field values decoded from beacon advertisements.
//!
//! A [`Field`] is a single attribute carried by an advertisement payload: a
//! UUID-like identifier, a major/minor number, a URL, a raw byte blob. Typed
//! beacon schemes (iBeacon, Eddystone) assign meaning positionally, so a
//! beacon's identity is an ordered [`Fields`] sequence and comparisons are
//! order- and length-sensitive.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single identifying or data attribute of a beacon.
///
/// Equality is structural and stable: two fields are equal iff they are the
/// same variant holding the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Field {
    /// A 128-bit identifier, e.g. an iBeacon proximity UUID.
    Uuid(Uuid),
    /// An integer value, e.g. an iBeacon major/minor or a calibrated
    /// transmit power in dBm.
    Number(i64),
    /// A textual value, e.g. an Eddystone-URL payload.
    Text(String),
    /// Raw bytes, e.g. an Eddystone namespace or instance identifier.
    Bytes(Vec<u8>),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "{uuid}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<Uuid> for Field {
    fn from(uuid: Uuid) -> Self {
        Self::Uuid(uuid)
    }
}

impl From<i64> for Field {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Field {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// An ordered sequence of field values.
///
/// Order is significant: two sequences holding the same fields in a
/// different order are not equal.
pub type Fields = Vec<Field>;
