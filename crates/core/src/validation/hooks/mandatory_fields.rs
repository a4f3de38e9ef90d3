// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{
    Enrollment, Event, Relationship, RelationshipItem, TrackedEntity, TrackerDto,
};
use tracker_report::TrackerErrorCode;

/// Rejects objects missing a property the commit cannot do without.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreCheckMandatoryFieldsValidationHook;

/// Reports every `(property, present)` pair that is missing.
fn require<T: TrackerDto>(
    reporter: &mut ValidationErrorReporter,
    dto: &T,
    code: TrackerErrorCode,
    properties: &[(&str, bool)],
) -> HookResult {
    for &(property, present) in properties {
        if !present {
            reporter.add_error_for(dto, code, &[property])?;
        }
    }
    ControlFlow::Continue(())
}

fn has_reference(item: Option<&RelationshipItem>) -> bool {
    item.and_then(RelationshipItem::reference).is_some()
}

impl TrackerValidationHook for PreCheckMandatoryFieldsValidationHook {
    fn name(&self) -> &'static str {
        "pre_check_mandatory_fields"
    }

    fn validate_tracked_entity(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) -> HookResult {
        require(
            reporter,
            tracked_entity,
            TrackerErrorCode::E1121,
            &[
                (
                    "trackedEntityType",
                    !tracked_entity.tracked_entity_type.is_empty(),
                ),
                ("orgUnit", !tracked_entity.org_unit.is_empty()),
            ],
        )
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        require(
            reporter,
            enrollment,
            TrackerErrorCode::E1122,
            &[
                ("program", !enrollment.program.is_empty()),
                ("orgUnit", !enrollment.org_unit.is_empty()),
                ("trackedEntity", !enrollment.tracked_entity.is_empty()),
            ],
        )
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        require(
            reporter,
            event,
            TrackerErrorCode::E1123,
            &[
                ("programStage", !event.program_stage.is_empty()),
                ("orgUnit", !event.org_unit.is_empty()),
            ],
        )
    }

    fn validate_relationship(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        relationship: &Relationship,
    ) -> HookResult {
        require(
            reporter,
            relationship,
            TrackerErrorCode::E1124,
            &[
                (
                    "relationshipType",
                    !relationship.relationship_type.is_empty(),
                ),
                ("from", has_reference(relationship.from.as_ref())),
                ("to", has_reference(relationship.to.as_ref())),
            ],
        )
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
