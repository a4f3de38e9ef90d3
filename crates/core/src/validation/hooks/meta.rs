// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{Enrollment, Event, Relationship, TrackedEntity, TrackerDto};
use tracker_report::TrackerErrorCode;

/// Rejects objects referencing metadata that is not preheated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreCheckMetaValidationHook;

fn require_found<T: TrackerDto>(
    reporter: &mut ValidationErrorReporter,
    dto: &T,
    code: TrackerErrorCode,
    identifier: &str,
    found: bool,
) -> HookResult {
    if found {
        ControlFlow::Continue(())
    } else {
        reporter.add_error_for(dto, code, &[identifier])
    }
}

impl TrackerValidationHook for PreCheckMetaValidationHook {
    fn name(&self) -> &'static str {
        "pre_check_meta"
    }

    fn validate_tracked_entity(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) -> HookResult {
        require_found(
            reporter,
            tracked_entity,
            TrackerErrorCode::E1049,
            &tracked_entity.org_unit,
            context.organisation_unit(&tracked_entity.org_unit).is_some(),
        )?;
        require_found(
            reporter,
            tracked_entity,
            TrackerErrorCode::E1005,
            &tracked_entity.tracked_entity_type,
            context
                .tracked_entity_type(&tracked_entity.tracked_entity_type)
                .is_some(),
        )
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        require_found(
            reporter,
            enrollment,
            TrackerErrorCode::E1070,
            &enrollment.org_unit,
            context.organisation_unit(&enrollment.org_unit).is_some(),
        )?;
        require_found(
            reporter,
            enrollment,
            TrackerErrorCode::E1069,
            &enrollment.program,
            context.program(&enrollment.program).is_some(),
        )
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        require_found(
            reporter,
            event,
            TrackerErrorCode::E1011,
            &event.org_unit,
            context.organisation_unit(&event.org_unit).is_some(),
        )?;
        // An event may leave its program to be derived from the stage.
        if !event.program.is_empty() {
            require_found(
                reporter,
                event,
                TrackerErrorCode::E1010,
                &event.program,
                context.program(&event.program).is_some(),
            )?;
        }
        require_found(
            reporter,
            event,
            TrackerErrorCode::E1013,
            &event.program_stage,
            context.program_stage(&event.program_stage).is_some(),
        )
    }

    fn validate_relationship(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        relationship: &Relationship,
    ) -> HookResult {
        require_found(
            reporter,
            relationship,
            TrackerErrorCode::E4006,
            &relationship.relationship_type,
            context
                .relationship_type(&relationship.relationship_type)
                .is_some(),
        )
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
