//! Persisted record codec.
//!
//! The record is the filter output itself, one JSON object keyed by unit
//! name:
//!
//! ```text
//! {"counter":5,"warningStore":["low-disk"]}
//! ```
//!
//! Anything that does not parse as such an object is corrupt.

use crate::error::PersistenceError;
use crate::tree::StateTree;

/// Encode a (filtered) tree into a record document.
pub fn encode_record(state: &StateTree) -> Result<String, PersistenceError> {
    serde_json::to_string(state).map_err(|e| PersistenceError::Write(e.to_string()))
}

/// Decode a record document.
pub fn decode_record(document: &str) -> Result<StateTree, PersistenceError> {
    serde_json::from_str(document)
        .map_err(|e| PersistenceError::Corrupt(format!("bad record JSON: {}", e)))
}
