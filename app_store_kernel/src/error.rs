//! Store error taxonomy.
//!
//! `StoreError` is surfaced to callers. `PersistenceError` never escapes
//! `dispatch` or `compose`: the store logs it and keeps going.

/// Errors returned by the registry and the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The unit set is malformed (duplicate names, empty names).
    /// Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No unit is registered under this name.
    #[error("unit not found: {0:?}")]
    UnitNotFound(String),

    /// The unit exists but declares no such mutation.
    #[error("operation {operation:?} not found on unit {unit:?}")]
    OperationNotFound { unit: String, operation: String },

    /// The unit exists but declares no such derived computation.
    #[error("computation {computation:?} not found on unit {unit:?}")]
    ComputationNotFound { unit: String, computation: String },

    /// No value exists at this path.
    #[error("path not found: {0:?}")]
    PathNotFound(String),

    /// The mutation rejected its argument. State is unchanged.
    #[error("operation {operation:?} on unit {unit:?} rejected its argument: {reason}")]
    InvalidArgument {
        unit: String,
        operation: String,
        reason: String,
    },

    /// A write outside `dispatch` while strict mode is on.
    #[error("strict mode: direct write to {path:?} outside dispatch")]
    StrictModeViolation { path: String },
}

impl StoreError {
    /// True for lookups of names or paths that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UnitNotFound(_)
                | StoreError::PathNotFound(_)
                | StoreError::OperationNotFound { .. }
                | StoreError::ComputationNotFound { .. }
        )
    }
}

/// Persistence backend and record codec failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backend could not be read.
    #[error("persistence read failed: {0}")]
    Read(String),

    /// The backend could not be written.
    #[error("persistence write failed: {0}")]
    Write(String),

    /// A record was read but is not a JSON object keyed by unit name.
    #[error("persisted record is corrupt: {0}")]
    Corrupt(String),
}
