// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::preheat::TrackerPreheat;
use crate::rule_engine::RuleEffects;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use tracker_domain::{
    AtomicMode, Enrollment, Event, FlushMode, Relationship, TrackedEntity, TrackerBundleMode,
    TrackerDto, TrackerIdentifierParams, TrackerImportStrategy, TrackerType, User, ValidationMode,
};
use tracker_report::TrackerValidationReport;

/// The unit of work of one import call.
///
/// A bundle owns the payload lists, the preheat built for them and the
/// mode flags of the import. Validation removes invalid objects from the
/// lists; the commit engine registers newly persisted objects in the
/// preheat.
#[derive(Debug, Clone, Default)]
pub struct TrackerBundle {
    /// The acting user.
    pub user: Option<User>,
    pub import_mode: TrackerBundleMode,
    /// The strategy requested for every object of the payload.
    pub import_strategy: TrackerImportStrategy,
    pub validation_mode: ValidationMode,
    pub flush_mode: FlushMode,
    pub atomic_mode: AtomicMode,
    pub skip_side_effects: bool,
    pub skip_rule_engine: bool,
    pub identifiers: TrackerIdentifierParams,
    pub tracked_entities: Vec<TrackedEntity>,
    pub enrollments: Vec<Enrollment>,
    pub events: Vec<Event>,
    pub relationships: Vec<Relationship>,
    pub preheat: TrackerPreheat,
    /// Rule effects per enrollment uid, shared with side-effect handlers.
    pub enrollment_rule_effects: Arc<RuleEffects>,
    /// Rule effects per event uid, shared with side-effect handlers.
    pub event_rule_effects: Arc<RuleEffects>,
    pub(crate) resolved_strategies: HashMap<TrackerType, HashMap<String, TrackerImportStrategy>>,
}

impl TrackerBundle {
    /// Creates an empty bundle acting as `user`, with default flags.
    #[must_use]
    pub fn new(user: Option<User>) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    /// Returns the username of the acting user, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }

    /// Returns the number of payload objects across all four lists.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tracked_entities.len()
            + self.enrollments.len()
            + self.events.len()
            + self.relationships.len()
    }

    /// Returns whether all four payload lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Resolves the import strategy of every payload object.
    ///
    /// `CREATE_AND_UPDATE` becomes `UPDATE` for objects present in the
    /// preheat and `CREATE` for the others. Every other strategy is kept as
    /// requested. Must run after the preheat is attached.
    pub fn resolve_strategies(&mut self) {
        let requested: TrackerImportStrategy = self.import_strategy;
        let resolve = |exists: bool| -> TrackerImportStrategy {
            if !requested.is_create_and_update() {
                requested
            } else if exists {
                TrackerImportStrategy::Update
            } else {
                TrackerImportStrategy::Create
            }
        };

        let mut resolved: HashMap<TrackerType, HashMap<String, TrackerImportStrategy>> =
            HashMap::new();

        for tracked_entity in &self.tracked_entities {
            let exists: bool = self
                .preheat
                .tracked_entity(&tracked_entity.tracked_entity)
                .is_some();
            resolved
                .entry(TrackerType::TrackedEntity)
                .or_default()
                .insert(tracked_entity.tracked_entity.clone(), resolve(exists));
        }
        for enrollment in &self.enrollments {
            let exists: bool = self.preheat.enrollment(&enrollment.enrollment).is_some();
            resolved
                .entry(TrackerType::Enrollment)
                .or_default()
                .insert(enrollment.enrollment.clone(), resolve(exists));
        }
        for event in &self.events {
            let exists: bool = self.preheat.event(&event.event).is_some();
            resolved
                .entry(TrackerType::Event)
                .or_default()
                .insert(event.event.clone(), resolve(exists));
        }
        for relationship in &self.relationships {
            let exists: bool = self
                .preheat
                .relationship(&relationship.relationship)
                .is_some();
            resolved
                .entry(TrackerType::Relationship)
                .or_default()
                .insert(relationship.relationship.clone(), resolve(exists));
        }

        self.resolved_strategies = resolved;
    }

    /// Overrides the resolved strategy of one payload object.
    pub fn set_strategy(
        &mut self,
        tracker_type: TrackerType,
        uid: impl Into<String>,
        strategy: TrackerImportStrategy,
    ) {
        self.resolved_strategies
            .entry(tracker_type)
            .or_default()
            .insert(uid.into(), strategy);
    }

    /// Returns the resolved strategy of a payload object.
    ///
    /// Falls back to the requested strategy when the object was not
    /// resolved.
    #[must_use]
    pub fn strategy(&self, tracker_type: TrackerType, uid: &str) -> TrackerImportStrategy {
        self.resolved_strategies
            .get(&tracker_type)
            .and_then(|strategies| strategies.get(uid))
            .copied()
            .unwrap_or(self.import_strategy)
    }

    /// Returns the resolved strategy of `dto`.
    #[must_use]
    pub fn strategy_for<T: TrackerDto + ?Sized>(&self, dto: &T) -> TrackerImportStrategy {
        self.strategy(dto.tracker_type(), dto.uid())
    }

    /// Removes every payload object that has an error in `report`.
    ///
    /// Objects are matched by tracker type and uid. Running the filter again
    /// with the same report leaves the bundle unchanged.
    pub fn remove_invalid(&mut self, report: &TrackerValidationReport) {
        let invalid: HashSet<(TrackerType, &str)> = report
            .errors
            .iter()
            .map(|error| (error.tracker_type, error.uid.as_str()))
            .collect();

        if invalid.is_empty() {
            return;
        }

        let before: usize = self.size();
        self.tracked_entities
            .retain(|dto| !invalid.contains(&(TrackerType::TrackedEntity, dto.uid())));
        self.enrollments
            .retain(|dto| !invalid.contains(&(TrackerType::Enrollment, dto.uid())));
        self.events
            .retain(|dto| !invalid.contains(&(TrackerType::Event, dto.uid())));
        self.relationships
            .retain(|dto| !invalid.contains(&(TrackerType::Relationship, dto.uid())));

        debug!(
            removed = before - self.size(),
            remaining = self.size(),
            "Removed invalid objects from bundle"
        );
    }
}
