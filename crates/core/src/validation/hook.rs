// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::context::TrackerImportValidationContext;
use crate::validation::reporter::ValidationErrorReporter;
use std::ops::ControlFlow;
use tracker_domain::{Enrollment, Event, Relationship, TrackedEntity, TrackerImportStrategy};

/// Signal that the hook chain must stop.
///
/// Raised by the reporter in fail-fast mode when the first error is
/// recorded. Already collected errors and warnings are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailFast;

/// The result of a hook callback.
pub type HookResult = ControlFlow<FailFast>;

/// One validator of the hook chain.
///
/// Every callback defaults to a no-op, so a hook implements only the
/// callbacks for the types it checks. Callbacks report findings through
/// the reporter and propagate its fail-fast signal with `?`.
pub trait TrackerValidationHook: Send + Sync {
    /// Name used for timings and logs.
    fn name(&self) -> &'static str;

    /// Bundle-level check, run once before the per-object callbacks.
    fn validate(
        &self,
        _reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
    ) -> HookResult {
        ControlFlow::Continue(())
    }

    fn validate_tracked_entity(
        &self,
        _reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        _tracked_entity: &TrackedEntity,
    ) -> HookResult {
        ControlFlow::Continue(())
    }

    fn validate_enrollment(
        &self,
        _reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        _enrollment: &Enrollment,
    ) -> HookResult {
        ControlFlow::Continue(())
    }

    fn validate_event(
        &self,
        _reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        _event: &Event,
    ) -> HookResult {
        ControlFlow::Continue(())
    }

    fn validate_relationship(
        &self,
        _reporter: &mut ValidationErrorReporter,
        _context: &mut TrackerImportValidationContext<'_>,
        _relationship: &Relationship,
    ) -> HookResult {
        ControlFlow::Continue(())
    }

    /// Whether the per-object callbacks run for objects with `strategy`.
    ///
    /// Only consulted for `DELETE`; other strategies always run.
    fn needs_to_run(&self, strategy: TrackerImportStrategy) -> bool {
        !strategy.is_delete()
    }

    /// Whether an object this hook finds invalid is hidden from later hooks.
    fn remove_on_error(&self) -> bool {
        false
    }
}
