// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error_code::TrackerErrorCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracker_domain::TrackerType;

/// A validation error raised against one payload object.
///
/// An object with at least one error is excluded from the commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerErrorReport {
    pub error_code: TrackerErrorCode,
    pub tracker_type: TrackerType,
    pub uid: String,
    pub message: String,
}

impl TrackerErrorReport {
    /// Creates an error record, formatting the code's message with `args`.
    #[must_use]
    pub fn new(
        error_code: TrackerErrorCode,
        tracker_type: TrackerType,
        uid: impl Into<String>,
        args: &[&str],
    ) -> Self {
        Self {
            error_code,
            tracker_type,
            uid: uid.into(),
            message: error_code.format(args),
        }
    }
}

/// A validation warning raised against one payload object.
///
/// Warnings never block the commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerWarningReport {
    pub warning_code: TrackerErrorCode,
    pub tracker_type: TrackerType,
    pub uid: String,
    pub message: String,
}

impl TrackerWarningReport {
    /// Creates a warning record, formatting the code's message with `args`.
    #[must_use]
    pub fn new(
        warning_code: TrackerErrorCode,
        tracker_type: TrackerType,
        uid: impl Into<String>,
        args: &[&str],
    ) -> Self {
        Self {
            warning_code,
            tracker_type,
            uid: uid.into(),
            message: warning_code.format(args),
        }
    }
}

/// Wall-clock time spent in one named unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub name: String,
    pub elapsed: Duration,
}

impl Timing {
    /// Creates a timing record.
    #[must_use]
    pub fn new(name: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            elapsed,
        }
    }
}

/// The outcome of running a validation hook chain against a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerValidationReport {
    pub errors: Vec<TrackerErrorReport>,
    pub warnings: Vec<TrackerWarningReport>,
    pub timings: Vec<Timing>,
}

impl TrackerValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            timings: Vec::new(),
        }
    }

    /// Appends error records.
    pub fn add_errors(
        &mut self,
        errors: impl IntoIterator<Item = TrackerErrorReport>,
    ) -> &mut Self {
        self.errors.extend(errors);
        self
    }

    /// Appends warning records.
    pub fn add_warnings(
        &mut self,
        warnings: impl IntoIterator<Item = TrackerWarningReport>,
    ) -> &mut Self {
        self.warnings.extend(warnings);
        self
    }

    /// Appends a timing record.
    pub fn add_timing(&mut self, timing: Timing) -> &mut Self {
        self.timings.push(timing);
        self
    }

    /// Moves all records of `other` into this report.
    pub fn merge(&mut self, other: Self) -> &mut Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.timings.extend(other.timings);
        self
    }

    /// Returns whether any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns whether any error matches `predicate`.
    pub fn has_error(&self, predicate: impl Fn(&TrackerErrorReport) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }

    /// Returns whether any warning was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns whether any warning matches `predicate`.
    pub fn has_warning(&self, predicate: impl Fn(&TrackerWarningReport) -> bool) -> bool {
        self.warnings.iter().any(predicate)
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn size(&self) -> usize {
        self.errors.len()
    }
}
