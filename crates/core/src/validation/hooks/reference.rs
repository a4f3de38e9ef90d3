// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::TrackerBundle;
use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{
    Enrollment, Event, Program, Relationship, RelationshipItem, TrackerIdSchemeParam,
    TrackerModel, TrackerType,
};
use tracker_report::TrackerErrorCode;

/// Rejects references to tracker objects that are neither stored (and not
/// soft-deleted) nor valid members of the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreCheckReferenceValidationHook;

fn is_live<M: TrackerModel>(stored: Option<&M>) -> bool {
    stored.is_some_and(|model| !model.is_deleted())
}

fn is_stored(
    context: &TrackerImportValidationContext<'_>,
    tracker_type: TrackerType,
    uid: &str,
) -> bool {
    match tracker_type {
        TrackerType::TrackedEntity => is_live(context.tracked_entity_instance(uid)),
        TrackerType::Enrollment => is_live(context.program_instance(uid)),
        TrackerType::Event => is_live(context.program_stage_instance(uid)),
        TrackerType::Relationship => is_live(context.relationship(uid)),
    }
}

/// A payload-only object counts as missing once it has an error.
fn exists(
    reporter: &ValidationErrorReporter,
    context: &TrackerImportValidationContext<'_>,
    tracker_type: TrackerType,
    uid: &str,
) -> bool {
    is_stored(context, tracker_type, uid)
        || (context.reference(uid).is_some() && !reporter.is_invalid(tracker_type, uid))
}

fn is_rejected(
    reporter: &ValidationErrorReporter,
    context: &TrackerImportValidationContext<'_>,
    tracker_type: TrackerType,
    uid: &str,
) -> bool {
    reporter.is_invalid(tracker_type, uid) && !is_stored(context, tracker_type, uid)
}

/// Rejects payload objects whose parent only exists in the payload and was
/// rejected after this hook ran. Runs once at the end of every chain.
///
/// Objects are visited parents first, so a rejected tracked entity takes
/// its enrollments, their events and any relationship to them along.
pub fn reject_orphans(
    reporter: &mut ValidationErrorReporter,
    context: &TrackerImportValidationContext<'_>,
) {
    let bundle: &TrackerBundle = context.bundle();

    for enrollment in &bundle.enrollments {
        let tracked_entity: &str = &enrollment.tracked_entity;
        if !reporter.is_invalid(TrackerType::Enrollment, &enrollment.enrollment)
            && is_rejected(reporter, context, TrackerType::TrackedEntity, tracked_entity)
        {
            let _: HookResult =
                reporter.add_error_for(enrollment, TrackerErrorCode::E1068, &[tracked_entity]);
        }
    }

    for event in &bundle.events {
        let Some(enrollment) = event.enrollment.as_deref() else {
            continue;
        };
        if !reporter.is_invalid(TrackerType::Event, &event.event)
            && is_rejected(reporter, context, TrackerType::Enrollment, enrollment)
        {
            let _: HookResult =
                reporter.add_error_for(event, TrackerErrorCode::E1081, &[enrollment]);
        }
    }

    for relationship in &bundle.relationships {
        if reporter.is_invalid(TrackerType::Relationship, &relationship.relationship) {
            continue;
        }
        let items = [relationship.from.as_ref(), relationship.to.as_ref()];
        let orphaned = items
            .into_iter()
            .flatten()
            .filter_map(RelationshipItem::reference)
            .find(|&(tracker_type, uid)| is_rejected(reporter, context, tracker_type, uid));
        if let Some((tracker_type, uid)) = orphaned {
            let _: HookResult = reporter.add_error_for(
                relationship,
                TrackerErrorCode::E4012,
                &[tracker_type.as_str(), uid],
            );
        }
    }
}

/// Returns the program of an event, falling back to the program of its stage.
fn event_program<'a>(
    context: &TrackerImportValidationContext<'a>,
    event: &Event,
) -> Option<&'a Program> {
    context.program(&event.program).or_else(|| {
        let stage_program: &str = &context.program_stage(&event.program_stage)?.program;
        context
            .preheat()
            .get::<Program>(&TrackerIdSchemeParam::UID, stage_program)
    })
}

impl TrackerValidationHook for PreCheckReferenceValidationHook {
    fn name(&self) -> &'static str {
        "pre_check_reference"
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        let tracked_entity: &str = &enrollment.tracked_entity;
        if exists(reporter, context, TrackerType::TrackedEntity, tracked_entity) {
            return ControlFlow::Continue(());
        }
        reporter.add_error_for(enrollment, TrackerErrorCode::E1068, &[tracked_entity])
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        let registration: bool =
            event_program(context, event).is_some_and(Program::is_registration);
        if !registration {
            return ControlFlow::Continue(());
        }

        match event.enrollment.as_deref().filter(|uid| !uid.is_empty()) {
            None => reporter.add_error_for(event, TrackerErrorCode::E1033, &[&event.event]),
            Some(enrollment) if !exists(reporter, context, TrackerType::Enrollment, enrollment) => {
                reporter.add_error_for(event, TrackerErrorCode::E1081, &[enrollment])
            }
            Some(_) => ControlFlow::Continue(()),
        }
    }

    fn validate_relationship(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        relationship: &Relationship,
    ) -> HookResult {
        let items = [relationship.from.as_ref(), relationship.to.as_ref()];
        let references = items
            .into_iter()
            .flatten()
            .filter_map(RelationshipItem::reference);
        for (tracker_type, uid) in references {
            if !exists(reporter, context, tracker_type, uid) {
                reporter.add_error_for(
                    relationship,
                    TrackerErrorCode::E4012,
                    &[tracker_type.as_str(), uid],
                )?;
            }
        }
        ControlFlow::Continue(())
    }
}
