//! Beam Domain Types
//!
//! This module defines the records Beam hands back to its callers. They are the
//! common shape both backend protocol generations are translated into, and they
//! serialize with the PascalCase keys existing Beam consumers expect.
//!
//! Identifiers render as lowercase hex, opaque byte blobs as standard base64.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::error::{BeamError, Result};

/// Length of a chain identifier in bytes.
pub const IDENTIFIER_LEN: usize = 32;

/// A 32-byte chain identifier (block, collection or transaction id).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identifier([u8; IDENTIFIER_LEN]);

impl Identifier {
    pub fn new(bytes: [u8; IDENTIFIER_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds an identifier from a hash of arbitrary length.
    ///
    /// The hash is copied into a zeroed 32-byte buffer: longer hashes are
    /// truncated, shorter ones are zero-padded on the right.
    pub fn from_hash(hash: &[u8]) -> Self {
        let mut bytes = [0u8; IDENTIFIER_LEN];
        let n = hash.len().min(IDENTIFIER_LEN);
        bytes[..n].copy_from_slice(&hash[..n]);
        Self(bytes)
    }

    /// Parses a hex string that must decode to exactly 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self> {
        let decoded = hex::decode(s)?;
        let bytes: [u8; IDENTIFIER_LEN] = decoded.as_slice().try_into().map_err(|_| {
            BeamError::InvalidRequest(format!(
                "identifier must be {} bytes, got {}",
                IDENTIFIER_LEN,
                decoded.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LEN] {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identifier::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for byte blobs carried as standard base64 strings.
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for a list of base64 byte blobs.
pub mod base64_bytes_list {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&STANDARD.encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// A backend access node and the heights it is authoritative for.
///
/// The directory file uses PascalCase keys; camelCase and snake_case spellings
/// are accepted as well. `EndHeight` of `0` means the node is still current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeDescriptor {
    #[serde(alias = "startHeight", alias = "start_height")]
    pub start_height: u64,
    #[serde(default, alias = "endHeight", alias = "end_height")]
    pub end_height: u64,
    #[serde(alias = "address")]
    pub address: String,
    #[serde(default, alias = "isLegacy", alias = "is_legacy")]
    pub is_legacy: bool,
}

impl NodeDescriptor {
    pub fn new(start_height: u64, end_height: u64, address: impl Into<String>) -> Self {
        Self {
            start_height,
            end_height,
            address: address.into(),
            is_legacy: false,
        }
    }

    pub fn legacy(mut self) -> Self {
        self.is_legacy = true;
        self
    }

    /// `true` when the node has no upper height bound.
    pub fn is_unbounded(&self) -> bool {
        self.end_height == 0
    }

    /// `true` when this node can answer for `height`.
    pub fn covers(&self, height: u64) -> bool {
        self.start_height <= height && (self.is_unbounded() || self.end_height >= height)
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {} (Legacy={})",
            self.start_height,
            self.end_height,
            self.address,
            u8::from(self.is_legacy)
        )
    }
}

/// An inclusive height range `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    start: u64,
    end: u64,
}

impl QueryRange {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(BeamError::InvalidRequest(format!(
                "start height {} is greater than end height {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of heights in the range (saturating at `u64::MAX`).
    pub fn height_count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    pub fn contains(&self, height: u64) -> bool {
        self.start <= height && height <= self.end
    }
}

impl fmt::Display for QueryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    #[serde(rename = "Type")]
    pub event_type: String,
    pub transaction_id: Identifier,
    pub transaction_index: u32,
    pub event_index: u32,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

/// Events of one block. `timestamp` is unix seconds, `0` for legacy nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockEventsRecord {
    #[serde(rename = "Id")]
    pub block_id: Identifier,
    pub height: u64,
    pub timestamp: i64,
    pub events: Vec<EventRecord>,
}

/// Result of a range query: blocks in ascending height order plus the number
/// of backend round trips attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AggregateResult {
    pub blocks: Vec<BlockEventsRecord>,
    pub api_calls: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub id: Identifier,
    pub height: u64,
    pub timestamp: i64,
    pub collection_ids: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Collection {
    pub id: Identifier,
    pub transaction_ids: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionEvent {
    pub transaction_index: u32,
    pub event_index: u32,
    #[serde(rename = "Type")]
    pub event_type: String,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResult {
    pub status: i32,
    pub status_code: u32,
    pub error_message: String,
    pub events: Vec<TransactionEvent>,
}

/// A single-node result together with the number of backend calls it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<T> {
    pub value: T,
    pub api_calls: u32,
}

impl<T> Counted<T> {
    pub fn new(value: T, api_calls: u32) -> Self {
        Self { value, api_calls }
    }
}
