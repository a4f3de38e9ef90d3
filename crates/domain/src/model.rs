// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence representation of tracker objects.
//!
//! Unlike the payload types, every reference here is a uid.

use crate::payload::{EnrollmentStatus, EventStatus, RelationshipItem};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Common behaviour of persisted tracker objects.
pub trait TrackerModel {
    /// The uid of the object.
    fn uid(&self) -> &str;
    /// Whether the object is soft-deleted.
    fn is_deleted(&self) -> bool;
}

/// A stored tracked entity attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntityAttributeValue {
    /// Uid of the tracked entity attribute.
    pub attribute: String,
    pub value: String,
    pub stored_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
}

/// A stored tracked entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntityInstance {
    pub uid: String,
    pub tracked_entity_type: String,
    pub organisation_unit: String,
    pub deleted: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated_at_client: Option<OffsetDateTime>,
    /// Username of the last user that changed this entity.
    pub last_updated_by: Option<String>,
    pub attribute_values: Vec<TrackedEntityAttributeValue>,
}

impl TrackedEntityInstance {
    /// Creates a non-deleted tracked entity with the given uid.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerModel for TrackedEntityInstance {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A stored enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramInstance {
    pub uid: String,
    /// Uid of the enrolled tracked entity.
    pub tracked_entity: Option<String>,
    pub program: String,
    pub organisation_unit: String,
    pub status: EnrollmentStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub enrollment_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub incident_date: Option<OffsetDateTime>,
    pub deleted: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated_at_client: Option<OffsetDateTime>,
    pub last_updated_by: Option<String>,
    /// Uids of the comments attached to this enrollment.
    pub comments: Vec<String>,
}

impl ProgramInstance {
    /// Creates a non-deleted enrollment with the given uid.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerModel for ProgramInstance {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A stored event data value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDataValue {
    /// Uid of the data element.
    pub data_element: String,
    pub value: String,
    pub stored_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramStageInstance {
    pub uid: String,
    /// Uid of the owning enrollment.
    pub program_instance: Option<String>,
    pub program_stage: String,
    pub organisation_unit: String,
    pub attribute_option_combo: Option<String>,
    pub status: EventStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub execution_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub deleted: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated_at_client: Option<OffsetDateTime>,
    pub last_updated_by: Option<String>,
    pub event_data_values: Vec<EventDataValue>,
    /// Uids of the comments attached to this event.
    pub comments: Vec<String>,
}

impl ProgramStageInstance {
    /// Creates a non-deleted event with the given uid.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerModel for ProgramStageInstance {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A stored relationship.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipInstance {
    pub uid: String,
    pub relationship_type: String,
    pub from: RelationshipItem,
    pub to: RelationshipItem,
    pub bidirectional: bool,
    pub deleted: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    pub last_updated_by: Option<String>,
}

impl RelationshipInstance {
    /// Creates a non-deleted relationship with the given uid.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerModel for RelationshipInstance {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// A stored note on an enrollment or event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntityComment {
    pub uid: String,
    pub comment_text: String,
    pub creator: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
}

/// The organisation unit owning a tracked entity within a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramOwner {
    pub tracked_entity: String,
    pub program: String,
    pub organisation_unit: String,
}
