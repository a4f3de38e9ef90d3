// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::hook::{FailFast, HookResult};
use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;
use tracker_domain::{TrackerDto, TrackerType, ValidationMode};
use tracker_report::{
    TrackerErrorCode, TrackerErrorReport, TrackerValidationReport, TrackerWarningReport,
};

/// Collects the findings of one validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrorReporter {
    fail_fast: bool,
    errors: Vec<TrackerErrorReport>,
    warnings: Vec<TrackerWarningReport>,
    invalid: HashMap<TrackerType, HashSet<String>>,
}

impl ValidationErrorReporter {
    /// Creates an empty reporter; `FAIL_FAST` makes every error break.
    #[must_use]
    pub fn new(validation_mode: ValidationMode) -> Self {
        Self {
            fail_fast: validation_mode == ValidationMode::FailFast,
            ..Self::default()
        }
    }

    /// Records an error and marks its object invalid.
    ///
    /// # Returns
    ///
    /// `Break(FailFast)` in fail-fast mode, `Continue` otherwise.
    pub fn add_error(&mut self, error: TrackerErrorReport) -> HookResult {
        self.invalid
            .entry(error.tracker_type)
            .or_default()
            .insert(error.uid.clone());
        self.errors.push(error);

        if self.fail_fast {
            ControlFlow::Break(FailFast)
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Records an error against `dto`. See [`Self::add_error`].
    pub fn add_error_for<T: TrackerDto + ?Sized>(
        &mut self,
        dto: &T,
        code: TrackerErrorCode,
        args: &[&str],
    ) -> HookResult {
        self.add_error(TrackerErrorReport::new(
            code,
            dto.tracker_type(),
            dto.uid(),
            args,
        ))
    }

    /// Records a warning. Warnings never break the chain.
    pub fn add_warning(&mut self, warning: TrackerWarningReport) {
        self.warnings.push(warning);
    }

    /// Records a warning against `dto`.
    pub fn add_warning_for<T: TrackerDto + ?Sized>(
        &mut self,
        dto: &T,
        code: TrackerErrorCode,
        args: &[&str],
    ) {
        self.add_warning(TrackerWarningReport::new(
            code,
            dto.tracker_type(),
            dto.uid(),
            args,
        ));
    }

    /// Returns whether an error was recorded for the object.
    #[must_use]
    pub fn is_invalid(&self, tracker_type: TrackerType, uid: &str) -> bool {
        self.invalid
            .get(&tracker_type)
            .is_some_and(|uids| uids.contains(uid))
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[TrackerErrorReport] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[TrackerWarningReport] {
        &self.warnings
    }

    /// Consumes the reporter into a report without timings.
    #[must_use]
    pub fn into_report(self) -> TrackerValidationReport {
        let mut report: TrackerValidationReport = TrackerValidationReport::new();
        report.add_errors(self.errors).add_warnings(self.warnings);
        report
    }
}
