// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The serialized form of an in-memory store.
//!
//! A snapshot is plain JSON: metadata per kind, users, and the tracker
//! objects with their attribute and data values embedded. It is used as the
//! fixture format of the CLI and of tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracker_domain::{
    CategoryOption, CategoryOptionCombo, DataElement, FileResource, OrganisationUnit, Program,
    ProgramInstance, ProgramOwner, ProgramStage, ProgramStageInstance, RelationshipInstance,
    RelationshipType, TrackedEntityAttribute, TrackedEntityComment, TrackedEntityInstance,
    TrackedEntityType, User,
};

/// Every object of an in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    pub organisation_units: Vec<OrganisationUnit>,
    pub programs: Vec<Program>,
    pub program_stages: Vec<ProgramStage>,
    pub tracked_entity_types: Vec<TrackedEntityType>,
    pub tracked_entity_attributes: Vec<TrackedEntityAttribute>,
    pub data_elements: Vec<DataElement>,
    pub relationship_types: Vec<RelationshipType>,
    pub category_option_combos: Vec<CategoryOptionCombo>,
    pub category_options: Vec<CategoryOption>,
    pub file_resources: Vec<FileResource>,
    pub users: Vec<User>,
    /// Uid of the user signed in to the session.
    pub current_user: Option<String>,
    pub tracked_entities: Vec<TrackedEntityInstance>,
    pub enrollments: Vec<ProgramInstance>,
    pub events: Vec<ProgramStageInstance>,
    pub relationships: Vec<RelationshipInstance>,
    pub comments: Vec<TrackedEntityComment>,
    pub program_owners: Vec<ProgramOwner>,
    /// Text pattern -> values reserved and not yet used.
    pub reserved_values: BTreeMap<String, Vec<String>>,
}

impl StoreSnapshot {
    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
