// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{
    Enrollment, Event, Note, Relationship, TrackedEntity, TrackerDto, TrackerImportStrategy,
    is_valid_uid,
};
use tracker_report::TrackerErrorCode;

/// Rejects objects and notes whose uid is not a well-formed uid (E1048).
///
/// Empty note uids are accepted; such notes get a uid when persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreCheckUidValidationHook;

impl PreCheckUidValidationHook {
    fn check_uid<T: TrackerDto>(reporter: &mut ValidationErrorReporter, dto: &T) -> HookResult {
        if is_valid_uid(dto.uid()) {
            return ControlFlow::Continue(());
        }
        reporter.add_error_for(
            dto,
            TrackerErrorCode::E1048,
            &[dto.tracker_type().as_str(), dto.uid()],
        )
    }

    fn check_notes<T: TrackerDto>(
        reporter: &mut ValidationErrorReporter,
        dto: &T,
        notes: &[Note],
    ) -> HookResult {
        for note in notes {
            if !note.note.is_empty() && !is_valid_uid(&note.note) {
                reporter.add_error_for(dto, TrackerErrorCode::E1048, &["NOTE", &note.note])?;
            }
        }
        ControlFlow::Continue(())
    }
}

impl TrackerValidationHook for PreCheckUidValidationHook {
    fn name(&self) -> &'static str {
        "pre_check_uid"
    }

    fn validate_tracked_entity(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) -> HookResult {
        Self::check_uid(reporter, tracked_entity)
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        Self::check_uid(reporter, enrollment)?;
        Self::check_notes(reporter, enrollment, &enrollment.notes)
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        Self::check_uid(reporter, event)?;
        Self::check_notes(reporter, event, &event.notes)
    }

    fn validate_relationship(
        &self,
        reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        relationship: &Relationship,
    ) -> HookResult {
        Self::check_uid(reporter, relationship)
    }

    fn needs_to_run(&self, _strategy: TrackerImportStrategy) -> bool {
        true
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
