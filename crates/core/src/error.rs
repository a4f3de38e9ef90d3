// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tracker_domain::{DomainError, MetadataKind, TrackerType};

/// Errors raised by the import pipeline itself, as opposed to findings
/// about the payload, which are recorded in the validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A caller passed an argument that breaks an operation's precondition.
    InvalidArgument(String),
    /// Metadata that validation should have guaranteed is not preheated.
    MissingMetadata {
        kind: MetadataKind,
        identifier: String,
    },
    /// A tracker object that validation should have guaranteed is unknown.
    MissingReference {
        tracker_type: TrackerType,
        uid: String,
    },
    /// A bundle lifecycle hook failed.
    HookFailed { hook: &'static str, message: String },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::MissingMetadata { kind, identifier } => {
                write!(f, "Metadata {kind:?} '{identifier}' is not preheated")
            }
            Self::MissingReference { tracker_type, uid } => {
                write!(f, "{tracker_type} '{uid}' is neither stored nor in the bundle")
            }
            Self::HookFailed { hook, message } => {
                write!(f, "Bundle hook '{hook}' failed: {message}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
