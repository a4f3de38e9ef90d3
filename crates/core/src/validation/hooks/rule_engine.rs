// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rule_engine::{RuleAction, RuleEffect};
use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{Enrollment, EnrollmentStatus, Event, EventStatus, TrackerDto};
use tracker_report::TrackerErrorCode;

/// Turns error and warning rule effects into E1300 findings.
///
/// The `*OnComplete` variants only apply to completed objects.
fn report_effects<T: TrackerDto>(
    reporter: &mut ValidationErrorReporter,
    dto: &T,
    effects: &[RuleEffect],
    completed: bool,
) -> HookResult {
    for effect in effects {
        match &effect.action {
            RuleAction::ShowError { message } => {
                reporter.add_error_for(dto, TrackerErrorCode::E1300, &[&effect.rule, message])?;
            }
            RuleAction::ErrorOnComplete { message } if completed => {
                reporter.add_error_for(dto, TrackerErrorCode::E1300, &[&effect.rule, message])?;
            }
            RuleAction::ShowWarning { message } => {
                reporter.add_warning_for(dto, TrackerErrorCode::E1300, &[&effect.rule, message]);
            }
            RuleAction::WarningOnComplete { message } if completed => {
                reporter.add_warning_for(dto, TrackerErrorCode::E1300, &[&effect.rule, message]);
            }
            _ => {}
        }
    }
    ControlFlow::Continue(())
}

/// Reports the rule effects computed for enrollments.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrollmentRuleValidationHook;

impl TrackerValidationHook for EnrollmentRuleValidationHook {
    fn name(&self) -> &'static str {
        "enrollment_rule"
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        let Some(effects) = context
            .bundle()
            .enrollment_rule_effects
            .get(&enrollment.enrollment)
        else {
            return ControlFlow::Continue(());
        };
        report_effects(
            reporter,
            enrollment,
            effects,
            enrollment.status == EnrollmentStatus::Completed,
        )
    }
}

/// Reports the rule effects computed for events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRuleValidationHook;

impl TrackerValidationHook for EventRuleValidationHook {
    fn name(&self) -> &'static str {
        "event_rule"
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        let Some(effects) = context.bundle().event_rule_effects.get(&event.event) else {
            return ControlFlow::Continue(());
        };
        report_effects(
            reporter,
            event,
            effects,
            event.status == EventStatus::Completed,
        )
    }
}
