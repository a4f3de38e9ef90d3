// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::{TrackerBundleReport, TrackerStats, TrackerStatus};
use crate::validation::TrackerValidationReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock time spent in each phase of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerTimingsStats {
    pub preheat: Duration,
    pub validation: Duration,
    pub program_rule: Duration,
    pub commit: Duration,
    pub total: Duration,
}

/// The result of one import call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerImportReport {
    pub status: TrackerStatus,
    pub validation_report: TrackerValidationReport,
    pub bundle_report: TrackerBundleReport,
    pub timings_stats: TrackerTimingsStats,
    pub stats: TrackerStats,
}

impl TrackerImportReport {
    /// Assembles the import report from its phase results.
    ///
    /// The status is derived from the validation report: `ERROR` when any
    /// error was recorded, `WARNING` when only warnings were recorded and
    /// `OK` otherwise. Objects dropped by validation are counted as ignored.
    ///
    /// # Arguments
    ///
    /// * `validation_report` - The merged validation report
    /// * `bundle_report` - The commit report; empty when nothing was committed
    /// * `timings_stats` - Per-phase timings
    /// * `submitted` - The number of objects in the original payload
    #[must_use]
    pub fn new(
        validation_report: TrackerValidationReport,
        mut bundle_report: TrackerBundleReport,
        timings_stats: TrackerTimingsStats,
        submitted: usize,
    ) -> Self {
        let status: TrackerStatus = if validation_report.has_errors() {
            TrackerStatus::Error
        } else if validation_report.has_warnings() {
            TrackerStatus::Warning
        } else {
            TrackerStatus::Ok
        };
        bundle_report.status = status;

        let mut stats: TrackerStats = bundle_report.stats();
        stats.ignored += submitted.saturating_sub(stats.total());

        Self {
            status,
            validation_report,
            bundle_report,
            timings_stats,
            stats,
        }
    }
}
