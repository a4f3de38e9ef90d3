// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Import boundary of the tracker import pipeline.
//!
//! [`TrackerImportService`] drives one import end to end:
//!
//! 1. Resolve the acting user
//! 2. Build the bundle and preheat its reference data
//! 3. Validate it with the general hook chain
//! 4. Run the rule engine and the rule-engine hook chain
//! 5. Commit what is left, unless the import is atomic and something failed
//!
//! The outcome is always a [`tracker_report::TrackerImportReport`]. Only
//! infrastructure failures surface as [`ApiError`].

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

mod error;
mod params;
mod service;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use params::TrackerImportParams;
pub use service::TrackerImportService;
