// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the import boundary.
//!
//! Payload problems are never errors here: they end up in the validation
//! report. An [`ApiError`] means the import itself could not run.

use thiserror::Error;
use tracker_persistence::PersistenceError;

/// Failures that abort an import.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The import parameters are not valid JSON for the expected shape.
    #[error("Invalid import payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// Reference data could not be loaded for the bundle.
    #[error("Preheat failed: {0}")]
    Preheat(#[source] PersistenceError),
    /// The commit was rolled back.
    #[error("Commit failed: {0}")]
    Commit(#[source] PersistenceError),
}
