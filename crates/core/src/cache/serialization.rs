//! Pure functions for serializing/deserializing cache entries to/from bytes.
//!
//! Entries are stored as adjacently tagged JSON documents so a negative
//! marker (`{"state":"absent"}`) can never be mistaken for a zero-valued
//! entity, and a payload that does not match the expected type surfaces as
//! a deserialization failure instead of a default value.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// A cached mirror of a system-of-record lookup.
///
/// `Absent` records a confirmed miss so repeated lookups for keys that do not
/// exist are absorbed by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum CacheEntry<T> {
    Present(T),
    Absent,
}

impl<T> CacheEntry<T> {
    /// Converts the entry into an `Option`, mapping the negative marker to `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheEntry::Present(value) => Some(value),
            CacheEntry::Absent => None,
        }
    }

    /// Returns true if this entry is the negative marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, CacheEntry::Absent)
    }
}

impl<T> From<Option<T>> for CacheEntry<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => CacheEntry::Present(v),
            None => CacheEntry::Absent,
        }
    }
}

/// Serializes a cache entry to JSON bytes.
pub fn serialize_entry<T: Serialize>(entry: &CacheEntry<T>) -> Result<Vec<u8>> {
    serde_json::to_vec(entry).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a cache entry of the expected type.
pub fn deserialize_entry<T: DeserializeOwned>(bytes: &[u8]) -> Result<CacheEntry<T>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
