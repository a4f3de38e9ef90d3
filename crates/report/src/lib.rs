// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Reports produced by the tracker import pipeline.
//!
//! Validation produces a [`TrackerValidationReport`], the commit engine a
//! [`TrackerBundleReport`], and the import service combines both into a
//! [`TrackerImportReport`].

mod bundle;
mod error_code;
mod import;
mod validation;

#[cfg(test)]
mod tests;

pub use bundle::{
    TrackerBundleReport, TrackerObjectReport, TrackerStats, TrackerStatus, TrackerTypeReport,
};
pub use error_code::TrackerErrorCode;
pub use import::{TrackerImportReport, TrackerTimingsStats};
pub use validation::{Timing, TrackerErrorReport, TrackerValidationReport, TrackerWarningReport};
