// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{
    Enrollment, Event, Relationship, TrackedEntity, TrackerDto, TrackerImportStrategy,
    TrackerModel,
};
use tracker_report::TrackerErrorCode;

/// The error codes of one tracker type for the existence state machine.
struct ExistenceCodes {
    already_exists: TrackerErrorCode,
    not_found: TrackerErrorCode,
    deleted: TrackerErrorCode,
}

const TRACKED_ENTITY_CODES: ExistenceCodes = ExistenceCodes {
    already_exists: TrackerErrorCode::E1002,
    not_found: TrackerErrorCode::E1063,
    deleted: TrackerErrorCode::E1114,
};

const ENROLLMENT_CODES: ExistenceCodes = ExistenceCodes {
    already_exists: TrackerErrorCode::E1080,
    not_found: TrackerErrorCode::E1081,
    deleted: TrackerErrorCode::E1113,
};

const EVENT_CODES: ExistenceCodes = ExistenceCodes {
    already_exists: TrackerErrorCode::E1030,
    not_found: TrackerErrorCode::E1032,
    deleted: TrackerErrorCode::E1082,
};

/// Checks the resolved strategy of each object against its stored state.
///
/// | strategy | absent | stored | soft-deleted |
/// |---|---|---|---|
/// | `CREATE` | ok | already exists | already exists |
/// | `UPDATE` / `DELETE` | not found | ok | deleted |
///
/// `CREATE_AND_UPDATE` is resolved to `CREATE` or `UPDATE` beforehand.
/// Relationships are immutable: a stored relationship only raises a
/// warning (E4015) and is left untouched by the commit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreCheckExistenceValidationHook;

impl PreCheckExistenceValidationHook {
    fn check<T: TrackerDto, M: TrackerModel>(
        reporter: &mut ValidationErrorReporter,
        dto: &T,
        existing: Option<&M>,
        strategy: TrackerImportStrategy,
        codes: &ExistenceCodes,
    ) -> HookResult {
        let code: Option<TrackerErrorCode> = match existing {
            Some(_) if strategy.is_create() => Some(codes.already_exists),
            Some(stored) if stored.is_deleted() => Some(codes.deleted),
            None if strategy.is_update() || strategy.is_delete() => Some(codes.not_found),
            _ => None,
        };

        match code {
            Some(code) => reporter.add_error_for(dto, code, &[dto.uid()]),
            None => ControlFlow::Continue(()),
        }
    }
}

impl TrackerValidationHook for PreCheckExistenceValidationHook {
    fn name(&self) -> &'static str {
        "pre_check_existence"
    }

    fn validate_tracked_entity(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) -> HookResult {
        Self::check(
            reporter,
            tracked_entity,
            context.tracked_entity_instance(&tracked_entity.tracked_entity),
            context.strategy(tracked_entity),
            &TRACKED_ENTITY_CODES,
        )
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        Self::check(
            reporter,
            enrollment,
            context.program_instance(&enrollment.enrollment),
            context.strategy(enrollment),
            &ENROLLMENT_CODES,
        )
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        Self::check(
            reporter,
            event,
            context.program_stage_instance(&event.event),
            context.strategy(event),
            &EVENT_CODES,
        )
    }

    fn validate_relationship(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        relationship: &Relationship,
    ) -> HookResult {
        let strategy: TrackerImportStrategy = context.strategy(relationship);
        let uid: &str = &relationship.relationship;

        match context.relationship(uid) {
            Some(stored) if stored.is_deleted() => {
                reporter.add_error_for(relationship, TrackerErrorCode::E4017, &[uid])
            }
            Some(_) if strategy.is_delete() => ControlFlow::Continue(()),
            Some(_) => {
                reporter.add_warning_for(relationship, TrackerErrorCode::E4015, &[uid]);
                ControlFlow::Continue(())
            }
            None if strategy.is_update() || strategy.is_delete() => {
                reporter.add_error_for(relationship, TrackerErrorCode::E4016, &[uid])
            }
            None => ControlFlow::Continue(()),
        }
    }

    fn needs_to_run(&self, _strategy: TrackerImportStrategy) -> bool {
        true
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
