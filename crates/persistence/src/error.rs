// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tracker::CoreError;
use tracker_domain::TrackerType;

/// A lock guarding committed store data was poisoned by a panicking writer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("store lock poisoned while {operation}")]
pub struct StoreLockError {
    pub operation: &'static str,
}

impl StoreLockError {
    #[must_use]
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// An earlier stage let through an object the commit cannot persist.
    ContractViolation(String),
    /// A staged object references a tracker object that does not exist.
    ForeignKeyViolation {
        tracker_type: TrackerType,
        uid: String,
        references: String,
    },
    /// The requested object was not found.
    NotFound(String),
    /// The store lock could not be acquired.
    Lock(StoreLockError),
    /// A bundle hook or converter failed.
    Core(CoreError),
    /// Serialization/deserialization error.
    SerializationError(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContractViolation(msg) => write!(f, "Contract violation: {msg}"),
            Self::ForeignKeyViolation {
                tracker_type,
                uid,
                references,
            } => write!(
                f,
                "Foreign key violation: {tracker_type} '{uid}' references missing '{references}'"
            ),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Lock(err) => write!(f, "Store unavailable: {err}"),
            Self::Core(err) => write!(f, "{err}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingMetadata { .. } | CoreError::MissingReference { .. } => {
                Self::ContractViolation(err.to_string())
            }
            _ => Self::Core(err),
        }
    }
}

impl From<StoreLockError> for PersistenceError {
    fn from(err: StoreLockError) -> Self {
        Self::Lock(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
