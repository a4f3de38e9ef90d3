// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::TrackerBundle;
use crate::error::CoreError;
use crate::preheat::{ReferenceTrackerEntity, TrackerPreheat};
use std::collections::HashMap;
use tracker_domain::{
    CategoryOption, CategoryOptionCombo, DataElement, FileResource, OrganisationUnit, Program,
    ProgramInstance, ProgramStage, ProgramStageInstance, RelationshipInstance, RelationshipType,
    TrackedEntityAttribute, TrackedEntityComment, TrackedEntityInstance, TrackedEntityType,
    TrackerDto, TrackerImportStrategy,
};

/// Read access to a bundle and its preheat for validation hooks.
///
/// Every getter returns `None` for unknown objects. The only mutable state
/// is a memo of resolved event attribute option combos.
#[derive(Debug)]
pub struct TrackerImportValidationContext<'a> {
    bundle: &'a TrackerBundle,
    event_category_option_combos: HashMap<String, CategoryOptionCombo>,
}

impl<'a> TrackerImportValidationContext<'a> {
    #[must_use]
    pub fn new(bundle: &'a TrackerBundle) -> Self {
        Self {
            bundle,
            event_category_option_combos: HashMap::new(),
        }
    }

    /// Returns the validated bundle.
    ///
    /// The reference outlives the context borrow, so hooks may iterate the
    /// payload while handing the context out mutably.
    #[must_use]
    pub const fn bundle(&self) -> &'a TrackerBundle {
        self.bundle
    }

    #[must_use]
    pub const fn preheat(&self) -> &'a TrackerPreheat {
        &self.bundle.preheat
    }

    /// Returns the resolved import strategy of `dto`.
    #[must_use]
    pub fn strategy<T: TrackerDto + ?Sized>(&self, dto: &T) -> TrackerImportStrategy {
        self.bundle.strategy_for(dto)
    }

    /// Memoizes the combo resolved for `key`, keeping an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `key` or the combo uid is
    /// empty.
    pub fn cache_event_category_option_combo(
        &mut self,
        key: &str,
        combo: &CategoryOptionCombo,
    ) -> Result<(), CoreError> {
        if key.is_empty() {
            return Err(CoreError::InvalidArgument(String::from(
                "category option combo cache key must not be empty",
            )));
        }
        if combo.uid.is_empty() {
            return Err(CoreError::InvalidArgument(String::from(
                "cached category option combo must have a uid",
            )));
        }

        self.event_category_option_combos
            .entry(key.to_string())
            .or_insert_with(|| combo.clone());
        Ok(())
    }

    #[must_use]
    pub fn cached_event_category_option_combo(&self, key: &str) -> Option<&CategoryOptionCombo> {
        self.event_category_option_combos.get(key)
    }

    #[must_use]
    pub fn organisation_unit(&self, identifier: &str) -> Option<&'a OrganisationUnit> {
        self.preheat().organisation_unit(identifier)
    }

    #[must_use]
    pub fn program(&self, identifier: &str) -> Option<&'a Program> {
        self.preheat().program(identifier)
    }

    #[must_use]
    pub fn program_stage(&self, identifier: &str) -> Option<&'a ProgramStage> {
        self.preheat().program_stage(identifier)
    }

    #[must_use]
    pub fn tracked_entity_type(&self, uid: &str) -> Option<&'a TrackedEntityType> {
        self.preheat().tracked_entity_type(uid)
    }

    #[must_use]
    pub fn tracked_entity_attribute(&self, uid: &str) -> Option<&'a TrackedEntityAttribute> {
        self.preheat().tracked_entity_attribute(uid)
    }

    #[must_use]
    pub fn data_element(&self, identifier: &str) -> Option<&'a DataElement> {
        self.preheat().data_element(identifier)
    }

    #[must_use]
    pub fn relationship_type(&self, uid: &str) -> Option<&'a RelationshipType> {
        self.preheat().relationship_type(uid)
    }

    #[must_use]
    pub fn category_option_combo(&self, identifier: &str) -> Option<&'a CategoryOptionCombo> {
        self.preheat().category_option_combo(identifier)
    }

    #[must_use]
    pub fn category_option(&self, identifier: &str) -> Option<&'a CategoryOption> {
        self.preheat().category_option(identifier)
    }

    #[must_use]
    pub fn file_resource(&self, uid: &str) -> Option<&'a FileResource> {
        self.preheat().file_resource(uid)
    }

    #[must_use]
    pub fn tracked_entity_instance(&self, uid: &str) -> Option<&'a TrackedEntityInstance> {
        self.preheat().tracked_entity(uid)
    }

    #[must_use]
    pub fn program_instance(&self, uid: &str) -> Option<&'a ProgramInstance> {
        self.preheat().enrollment(uid)
    }

    #[must_use]
    pub fn program_stage_instance(&self, uid: &str) -> Option<&'a ProgramStageInstance> {
        self.preheat().event(uid)
    }

    #[must_use]
    pub fn relationship(&self, uid: &str) -> Option<&'a RelationshipInstance> {
        self.preheat().relationship(uid)
    }

    #[must_use]
    pub fn note(&self, uid: &str) -> Option<&'a TrackedEntityComment> {
        self.preheat().note(uid)
    }

    #[must_use]
    pub fn reference(&self, uid: &str) -> Option<&'a ReferenceTrackerEntity> {
        self.preheat().reference(uid)
    }

    /// Returns the uid of the org unit owning `tracked_entity` in `program`.
    #[must_use]
    pub fn owner_org_unit(&self, tracked_entity: &str, program: &str) -> Option<&'a str> {
        self.preheat()
            .program_owner(tracked_entity, program)
            .map(|owner| owner.organisation_unit.as_str())
    }

    #[must_use]
    pub fn program_instance_has_events(&self, enrollment: &str) -> bool {
        self.preheat().program_instance_has_events(enrollment)
    }

    #[must_use]
    pub fn program_stage_has_events(&self, program_stage: &str, enrollment: &str) -> bool {
        self.preheat()
            .program_stage_has_events(program_stage, enrollment)
    }

    #[must_use]
    pub fn username_exists(&self, username: &str) -> bool {
        self.preheat().user(username).is_some()
    }
}
