// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracker_domain::TrackerType;

/// Overall status of an import or commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerStatus {
    #[default]
    Ok,
    Warning,
    Error,
}

/// Outcome counters for a set of tracker objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub ignored: usize,
}

impl TrackerStats {
    pub const fn inc_created(&mut self) {
        self.created += 1;
    }

    pub const fn inc_updated(&mut self) {
        self.updated += 1;
    }

    pub const fn inc_deleted(&mut self) {
        self.deleted += 1;
    }

    pub const fn inc_ignored(&mut self) {
        self.ignored += 1;
    }

    /// Adds the counters of `other` to this one.
    pub const fn merge(&mut self, other: &Self) {
        self.created += other.created;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.ignored += other.ignored;
    }

    /// Returns the total number of counted objects.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.updated + self.deleted + self.ignored
    }
}

/// Links a committed object back to its position in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerObjectReport {
    pub tracker_type: TrackerType,
    pub uid: String,
    /// Index of the object within its payload list.
    pub index: usize,
}

impl TrackerObjectReport {
    #[must_use]
    pub fn new(tracker_type: TrackerType, uid: impl Into<String>, index: usize) -> Self {
        Self {
            tracker_type,
            uid: uid.into(),
            index,
        }
    }
}

/// Commit outcome for one tracker type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerTypeReport {
    pub tracker_type: TrackerType,
    pub stats: TrackerStats,
    pub object_reports: Vec<TrackerObjectReport>,
}

impl TrackerTypeReport {
    /// Creates an empty report for `tracker_type`.
    #[must_use]
    pub const fn new(tracker_type: TrackerType) -> Self {
        Self {
            tracker_type,
            stats: TrackerStats {
                created: 0,
                updated: 0,
                deleted: 0,
                ignored: 0,
            },
            object_reports: Vec::new(),
        }
    }

    pub fn add_object_report(&mut self, object_report: TrackerObjectReport) {
        self.object_reports.push(object_report);
    }
}

/// Commit outcome of a whole bundle, per tracker type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerBundleReport {
    pub status: TrackerStatus,
    pub type_report_map: BTreeMap<TrackerType, TrackerTypeReport>,
}

impl TrackerBundleReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: TrackerStatus::Ok,
            type_report_map: BTreeMap::new(),
        }
    }

    /// Stores the report of one tracker type, replacing any previous one.
    pub fn put_type_report(&mut self, type_report: TrackerTypeReport) {
        self.type_report_map
            .insert(type_report.tracker_type, type_report);
    }

    /// Returns the report of `tracker_type`, if that type was committed.
    #[must_use]
    pub fn type_report(&self, tracker_type: TrackerType) -> Option<&TrackerTypeReport> {
        self.type_report_map.get(&tracker_type)
    }

    /// Returns the counters summed over all tracker types.
    #[must_use]
    pub fn stats(&self) -> TrackerStats {
        let mut stats: TrackerStats = TrackerStats::default();
        for type_report in self.type_report_map.values() {
            stats.merge(&type_report.stats);
        }
        stats
    }

    /// Returns whether no tracker type was committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.type_report_map.is_empty()
    }
}
