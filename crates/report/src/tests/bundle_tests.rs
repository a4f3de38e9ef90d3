// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{TrackerBundleReport, TrackerObjectReport, TrackerStats, TrackerTypeReport};
use tracker_domain::TrackerType;

#[test]
fn test_stats_counters() {
    let mut stats: TrackerStats = TrackerStats::default();
    stats.inc_created();
    stats.inc_created();
    stats.inc_updated();
    stats.inc_deleted();
    stats.inc_ignored();

    assert_eq!(stats.created, 2);
    assert_eq!(stats.total(), 5);
}

#[test]
fn test_bundle_stats_sum_type_reports() {
    let mut tracked_entities: TrackerTypeReport =
        TrackerTypeReport::new(TrackerType::TrackedEntity);
    tracked_entities.stats.inc_created();
    tracked_entities.add_object_report(TrackerObjectReport::new(
        TrackerType::TrackedEntity,
        "Te000000001",
        0,
    ));

    let mut events: TrackerTypeReport = TrackerTypeReport::new(TrackerType::Event);
    events.stats.inc_updated();
    events.stats.inc_deleted();

    let mut report: TrackerBundleReport = TrackerBundleReport::new();
    report.put_type_report(events);
    report.put_type_report(tracked_entities);

    let stats: TrackerStats = report.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.deleted, 1);

    let order: Vec<TrackerType> = report.type_report_map.keys().copied().collect();
    assert_eq!(order, vec![TrackerType::TrackedEntity, TrackerType::Event]);
    assert!(report.type_report(TrackerType::Enrollment).is_none());
}
