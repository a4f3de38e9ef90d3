// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{Enrollment, Event, Note, TrackerDto};
use tracker_report::TrackerErrorCode;

/// Warns about notes that are already stored (E1119). Such notes are not
/// persisted again.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotesValidationHook;

fn warn_existing<T: TrackerDto>(
    reporter: &mut ValidationErrorReporter,
    context: &TrackerImportValidationContext<'_>,
    dto: &T,
    notes: &[Note],
) {
    for note in notes.iter().filter(|note| context.note(&note.note).is_some()) {
        reporter.add_warning_for(dto, TrackerErrorCode::E1119, &[&note.note]);
    }
}

impl TrackerValidationHook for NotesValidationHook {
    fn name(&self) -> &'static str {
        "notes"
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        warn_existing(reporter, context, enrollment, &enrollment.notes);
        ControlFlow::Continue(())
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        warn_existing(reporter, context, event, &event.notes);
        ControlFlow::Continue(())
    }
}
