// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    TrackerBundleReport, TrackerErrorCode, TrackerErrorReport, TrackerImportReport, TrackerStatus,
    TrackerTimingsStats, TrackerTypeReport, TrackerValidationReport, TrackerWarningReport,
};
use tracker_domain::TrackerType;

fn create_test_bundle_report(created: usize) -> TrackerBundleReport {
    let mut type_report: TrackerTypeReport = TrackerTypeReport::new(TrackerType::TrackedEntity);
    for _ in 0..created {
        type_report.stats.inc_created();
    }
    let mut report: TrackerBundleReport = TrackerBundleReport::new();
    report.put_type_report(type_report);
    report
}

#[test]
fn test_status_ok_without_findings() {
    let report: TrackerImportReport = TrackerImportReport::new(
        TrackerValidationReport::new(),
        create_test_bundle_report(1),
        TrackerTimingsStats::default(),
        1,
    );

    assert_eq!(report.status, TrackerStatus::Ok);
    assert_eq!(report.bundle_report.status, TrackerStatus::Ok);
    assert_eq!(report.stats.created, 1);
    assert_eq!(report.stats.ignored, 0);
}

#[test]
fn test_status_warning_with_only_warnings() {
    let mut validation: TrackerValidationReport = TrackerValidationReport::new();
    validation.add_warnings([TrackerWarningReport::new(
        TrackerErrorCode::E4015,
        TrackerType::Relationship,
        "Rel00000001",
        &["Rel00000001"],
    )]);

    let report: TrackerImportReport = TrackerImportReport::new(
        validation,
        TrackerBundleReport::new(),
        TrackerTimingsStats::default(),
        0,
    );

    assert_eq!(report.status, TrackerStatus::Warning);
}

#[test]
fn test_status_error_counts_dropped_objects_as_ignored() {
    let mut validation: TrackerValidationReport = TrackerValidationReport::new();
    validation.add_errors([TrackerErrorReport::new(
        TrackerErrorCode::E1063,
        TrackerType::TrackedEntity,
        "Te000000002",
        &["Te000000002"],
    )]);

    let report: TrackerImportReport = TrackerImportReport::new(
        validation,
        create_test_bundle_report(1),
        TrackerTimingsStats::default(),
        2,
    );

    assert_eq!(report.status, TrackerStatus::Error);
    assert_eq!(report.stats.created, 1);
    assert_eq!(report.stats.ignored, 1);
}
