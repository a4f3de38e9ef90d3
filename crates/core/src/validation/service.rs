// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::TrackerBundle;
use crate::validation::context::TrackerImportValidationContext;
use crate::validation::hook::{HookResult, TrackerValidationHook};
use crate::validation::hooks;
use crate::validation::reporter::ValidationErrorReporter;
use std::collections::HashSet;
use std::ops::ControlFlow;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracker_domain::{TrackerDto, TrackerImportStrategy, TrackerType, User, ValidationMode};
use tracker_report::{Timing, TrackerValidationReport};

/// The ordered hook chains of the validation service.
pub struct ValidationConfig {
    /// Hooks run by [`TrackerValidationService::validate`].
    pub validation_hooks: Vec<Box<dyn TrackerValidationHook>>,
    /// Hooks run by [`TrackerValidationService::validate_rule_engine`].
    pub rule_engine_hooks: Vec<Box<dyn TrackerValidationHook>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validation_hooks: hooks::default_validation_hooks(),
            rule_engine_hooks: hooks::default_rule_engine_hooks(),
        }
    }
}

impl std::fmt::Debug for ValidationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |hooks: &[Box<dyn TrackerValidationHook>]| -> Vec<&'static str> {
            hooks.iter().map(|hook| hook.name()).collect()
        };
        f.debug_struct("ValidationConfig")
            .field("validation_hooks", &names(&self.validation_hooks))
            .field("rule_engine_hooks", &names(&self.rule_engine_hooks))
            .finish()
    }
}

/// Runs hook chains against bundles.
#[derive(Debug, Default)]
pub struct TrackerValidationService {
    config: ValidationConfig,
}

impl TrackerValidationService {
    #[must_use]
    pub const fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validates `bundle` with the general hook chain and removes every
    /// invalid object from it.
    pub fn validate(&self, bundle: &mut TrackerBundle) -> TrackerValidationReport {
        validate_with(&self.config.validation_hooks, bundle)
    }

    /// Validates `bundle` with the rule-engine hook chain and removes every
    /// invalid object from it.
    pub fn validate_rule_engine(&self, bundle: &mut TrackerBundle) -> TrackerValidationReport {
        validate_with(&self.config.rule_engine_hooks, bundle)
    }
}

/// Runs `hooks` in order against `bundle`.
///
/// Superusers (and imports without a user) may skip validation entirely with
/// `ValidationMode::Skip`; the bundle is then returned untouched with an
/// empty report.
fn validate_with(
    hooks: &[Box<dyn TrackerValidationHook>],
    bundle: &mut TrackerBundle,
) -> TrackerValidationReport {
    let may_skip: bool = bundle.user.as_ref().is_none_or(User::is_super);
    if may_skip && bundle.validation_mode == ValidationMode::Skip {
        warn!(
            user = bundle.username(),
            "Skipping validation for superuser, this is not recommended"
        );
        return TrackerValidationReport::new();
    }

    let mut reporter: ValidationErrorReporter =
        ValidationErrorReporter::new(bundle.validation_mode);
    let mut timings: Vec<Timing> = Vec::with_capacity(hooks.len());
    {
        let mut context: TrackerImportValidationContext<'_> =
            TrackerImportValidationContext::new(bundle);
        let mut excluded: HashSet<(TrackerType, String)> = HashSet::new();

        for hook in hooks {
            let start: Instant = Instant::now();
            let result: HookResult =
                run_hook(hook.as_ref(), &mut reporter, &mut context, &mut excluded);
            timings.push(Timing::new(hook.name(), start.elapsed()));

            if result.is_break() {
                info!(hook = hook.name(), "Validation stopped at first error");
                break;
            }
        }
        hooks::reject_orphans(&mut reporter, &context);
    }

    let mut report: TrackerValidationReport = reporter.into_report();
    for timing in timings {
        report.add_timing(timing);
    }

    bundle.remove_invalid(&report);
    info!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Validation complete"
    );
    report
}

/// Runs one hook against the bundle and every non-excluded object.
fn run_hook(
    hook: &dyn TrackerValidationHook,
    reporter: &mut ValidationErrorReporter,
    context: &mut TrackerImportValidationContext<'_>,
    excluded: &mut HashSet<(TrackerType, String)>,
) -> HookResult {
    let bundle: &TrackerBundle = context.bundle();

    hook.validate(reporter, context)?;

    for tracked_entity in &bundle.tracked_entities {
        if should_run(hook, context, excluded, tracked_entity) {
            hook.validate_tracked_entity(reporter, context, tracked_entity)?;
            exclude_if_invalid(hook, reporter, excluded, tracked_entity);
        }
    }
    for enrollment in &bundle.enrollments {
        if should_run(hook, context, excluded, enrollment) {
            hook.validate_enrollment(reporter, context, enrollment)?;
            exclude_if_invalid(hook, reporter, excluded, enrollment);
        }
    }
    for event in &bundle.events {
        if should_run(hook, context, excluded, event) {
            hook.validate_event(reporter, context, event)?;
            exclude_if_invalid(hook, reporter, excluded, event);
        }
    }
    for relationship in &bundle.relationships {
        if should_run(hook, context, excluded, relationship) {
            hook.validate_relationship(reporter, context, relationship)?;
            exclude_if_invalid(hook, reporter, excluded, relationship);
        }
    }

    ControlFlow::Continue(())
}

fn should_run<T: TrackerDto>(
    hook: &dyn TrackerValidationHook,
    context: &TrackerImportValidationContext<'_>,
    excluded: &HashSet<(TrackerType, String)>,
    dto: &T,
) -> bool {
    if excluded.contains(&(dto.tracker_type(), dto.uid().to_string())) {
        return false;
    }
    let strategy: TrackerImportStrategy = context.strategy(dto);
    !strategy.is_delete() || hook.needs_to_run(strategy)
}

fn exclude_if_invalid<T: TrackerDto>(
    hook: &dyn TrackerValidationHook,
    reporter: &ValidationErrorReporter,
    excluded: &mut HashSet<(TrackerType, String)>,
    dto: &T,
) {
    if hook.remove_on_error() && reporter.is_invalid(dto.tracker_type(), dto.uid()) {
        debug!(
            hook = hook.name(),
            tracker_type = %dto.tracker_type(),
            uid = dto.uid(),
            "Removing invalid object from remaining hooks"
        );
        excluded.insert((dto.tracker_type(), dto.uid().to_string()));
    }
}
