// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport representation of tracker objects as submitted by clients.
//!
//! References to metadata (`org_unit`, `program`, ...) are identifiers under
//! the identifier scheme configured for the import, not necessarily uids.

use crate::mode::TrackerType;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Common behaviour of all tracker payload objects.
pub trait TrackerDto {
    /// The uid of the object.
    fn uid(&self) -> &str;
    /// The kind of tracker object.
    fn tracker_type(&self) -> TrackerType;
}

/// A tracked entity attribute value in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attribute {
    /// Uid of the tracked entity attribute.
    pub attribute: String,
    /// The value; empty or absent clears the stored value.
    pub value: Option<String>,
    pub stored_by: Option<String>,
}

impl Attribute {
    /// Creates an attribute value.
    #[must_use]
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: Some(value.into()),
            stored_by: None,
        }
    }

    /// Returns the value if it is present and non-empty.
    #[must_use]
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|value| !value.is_empty())
    }
}

/// A note attached to an enrollment or event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub note: String,
    pub value: String,
    pub stored_by: Option<String>,
}

/// A tracked entity in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntity {
    pub tracked_entity: String,
    pub tracked_entity_type: String,
    pub org_unit: String,
    pub attributes: Vec<Attribute>,
}

impl TrackedEntity {
    /// Creates a tracked entity with only its uid set.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            tracked_entity: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerDto for TrackedEntity {
    fn uid(&self) -> &str {
        &self.tracked_entity
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::TrackedEntity
    }
}

/// Status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// An enrollment in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Enrollment {
    pub enrollment: String,
    /// Uid of the enrolled tracked entity.
    pub tracked_entity: String,
    pub program: String,
    pub org_unit: String,
    pub status: EnrollmentStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub enrolled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub occurred_at: Option<OffsetDateTime>,
    pub attributes: Vec<Attribute>,
    pub notes: Vec<Note>,
}

impl Enrollment {
    /// Creates an enrollment with only its uid set.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            enrollment: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerDto for Enrollment {
    fn uid(&self) -> &str {
        &self.enrollment
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Enrollment
    }
}

/// Status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Active,
    Completed,
    Visited,
    Schedule,
    Overdue,
    Skipped,
}

/// A data value recorded in an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataValue {
    /// Identifier of the data element.
    pub data_element: String,
    /// The value; empty or absent clears the stored value.
    pub value: Option<String>,
    pub stored_by: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl DataValue {
    /// Creates a data value.
    #[must_use]
    pub fn new(data_element: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            data_element: data_element.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Returns the value if it is present and non-empty.
    #[must_use]
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|value| !value.is_empty())
    }
}

/// An event in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub event: String,
    /// Uid of the owning enrollment; absent for programs without registration.
    pub enrollment: Option<String>,
    pub program: String,
    pub program_stage: String,
    pub org_unit: String,
    pub status: EventStatus,
    pub attribute_option_combo: Option<String>,
    /// Semicolon separated category option identifiers.
    pub attribute_category_options: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub occurred_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub scheduled_at: Option<OffsetDateTime>,
    pub data_values: Vec<DataValue>,
    pub notes: Vec<Note>,
}

impl Event {
    /// Creates an event with only its uid set.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            event: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerDto for Event {
    fn uid(&self) -> &str {
        &self.event
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Event
    }
}

/// One side of a relationship. Exactly one field is expected to be set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipItem {
    pub tracked_entity: Option<String>,
    pub enrollment: Option<String>,
    pub event: Option<String>,
}

impl RelationshipItem {
    /// Returns the referenced object as `(type, uid)`.
    #[must_use]
    pub fn reference(&self) -> Option<(TrackerType, &str)> {
        if let Some(uid) = self.tracked_entity.as_deref() {
            return Some((TrackerType::TrackedEntity, uid));
        }
        if let Some(uid) = self.enrollment.as_deref() {
            return Some((TrackerType::Enrollment, uid));
        }
        self.event.as_deref().map(|uid| (TrackerType::Event, uid))
    }
}

/// A relationship in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Relationship {
    pub relationship: String,
    pub relationship_type: String,
    pub from: Option<RelationshipItem>,
    pub to: Option<RelationshipItem>,
    pub bidirectional: bool,
}

impl Relationship {
    /// Creates a relationship with only its uid set.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            relationship: uid.into(),
            ..Self::default()
        }
    }
}

impl TrackerDto for Relationship {
    fn uid(&self) -> &str {
        &self.relationship
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Relationship
    }
}
