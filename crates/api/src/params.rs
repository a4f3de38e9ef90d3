// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use tracker::TrackerBundle;
use tracker_domain::{
    AtomicMode, Enrollment, Event, FlushMode, Relationship, TrackedEntity, TrackerBundleMode,
    TrackerIdentifierParams, TrackerImportStrategy, User, ValidationMode,
};

/// Everything one import call carries: the mode flags, the identifier
/// schemes and the payload itself.
///
/// Every field has a default, so `{}` is a valid (empty) import. Identifier
/// schemes sit at the top level of the JSON next to the mode flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerImportParams {
    /// The acting user. Reloaded from the identity service before use.
    pub user: Option<User>,
    /// Uid of the acting user when `user` is not given.
    pub user_id: Option<String>,
    pub import_mode: TrackerBundleMode,
    pub import_strategy: TrackerImportStrategy,
    pub validation_mode: ValidationMode,
    pub flush_mode: FlushMode,
    pub atomic_mode: AtomicMode,
    pub skip_side_effects: bool,
    pub skip_rule_engine: bool,
    #[serde(flatten)]
    pub identifiers: TrackerIdentifierParams,
    pub tracked_entities: Vec<TrackedEntity>,
    pub enrollments: Vec<Enrollment>,
    pub events: Vec<Event>,
    pub relationships: Vec<Relationship>,
}

impl TrackerImportParams {
    /// Parses import parameters from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] if the JSON does not describe an
    /// import.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The number of payload objects, across all four types.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tracked_entities.len()
            + self.enrollments.len()
            + self.events.len()
            + self.relationships.len()
    }

    /// Moves the flags and payload into a fresh bundle for `user`.
    ///
    /// The bundle starts with an empty preheat and no rule effects.
    #[must_use]
    pub fn into_bundle(self, user: Option<User>) -> TrackerBundle {
        let mut bundle: TrackerBundle = TrackerBundle::new(user);
        bundle.import_mode = self.import_mode;
        bundle.import_strategy = self.import_strategy;
        bundle.validation_mode = self.validation_mode;
        bundle.flush_mode = self.flush_mode;
        bundle.atomic_mode = self.atomic_mode;
        bundle.skip_side_effects = self.skip_side_effects;
        bundle.skip_rule_engine = self.skip_rule_engine;
        bundle.identifiers = self.identifiers;
        bundle.tracked_entities = self.tracked_entities;
        bundle.enrollments = self.enrollments;
        bundle.events = self.events;
        bundle.relationships = self.relationships;
        bundle
    }
}
