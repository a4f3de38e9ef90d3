// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Program rule evaluation ahead of the commit.
//!
//! The rule engine itself is a collaborator behind
//! [`TrackerProgramRuleService`]. The adapter here calls it per enrollment
//! and per event, keeps every effect that could be computed and logs the
//! failures. A failing rule never blocks the import.

use crate::bundle::TrackerBundle;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use tracing::{debug, error, info};
use tracker_domain::{Enrollment, Event};

/// Rule effects per tracker object uid.
pub type RuleEffects = HashMap<String, Vec<RuleEffect>>;

/// What a fired program rule asks the import to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Assign `value` to the data element or attribute `field`.
    AssignValue { field: String, value: String },
    ShowWarning { message: String },
    ShowError { message: String },
    /// A warning raised only when the object is completed.
    WarningOnComplete { message: String },
    /// An error raised only when the object is completed.
    ErrorOnComplete { message: String },
    /// Send the notification `template` right after the commit.
    SendMessage { template: String },
    /// Send the notification `template` at `scheduled_at`.
    ScheduleMessage {
        template: String,
        scheduled_at: OffsetDateTime,
    },
}

/// The outcome of one program rule for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEffect {
    /// Uid of the program rule that fired.
    pub rule: String,
    pub action: RuleAction,
}

impl RuleEffect {
    #[must_use]
    pub fn new(rule: impl Into<String>, action: RuleAction) -> Self {
        Self {
            rule: rule.into(),
            action,
        }
    }
}

/// A failure of the rule engine for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEngineError {
    pub uid: String,
    pub message: String,
}

impl RuleEngineError {
    #[must_use]
    pub fn new(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RuleEngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rule engine failed for '{}': {}", self.uid, self.message)
    }
}

impl std::error::Error for RuleEngineError {}

/// Computes program rule effects.
pub trait TrackerProgramRuleService {
    /// Computes the effects of the rules of the enrollment's program.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be evaluated for this enrollment.
    fn calculate_enrollment_effects(
        &self,
        enrollment: &Enrollment,
        bundle: &TrackerBundle,
    ) -> Result<Vec<RuleEffect>, RuleEngineError>;

    /// Computes the effects of the rules of the event's program stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be evaluated for this event.
    fn calculate_event_effects(
        &self,
        event: &Event,
        bundle: &TrackerBundle,
    ) -> Result<Vec<RuleEffect>, RuleEngineError>;
}

/// A rule service for deployments without program rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgramRules;

impl TrackerProgramRuleService for NoProgramRules {
    fn calculate_enrollment_effects(
        &self,
        _enrollment: &Enrollment,
        _bundle: &TrackerBundle,
    ) -> Result<Vec<RuleEffect>, RuleEngineError> {
        Ok(Vec::new())
    }

    fn calculate_event_effects(
        &self,
        _event: &Event,
        _bundle: &TrackerBundle,
    ) -> Result<Vec<RuleEffect>, RuleEngineError> {
        Ok(Vec::new())
    }
}

/// Runs the rule engine over `bundle` and stores the effects in it.
///
/// Objects whose evaluation fails get no effects; the failure is logged and
/// the remaining objects are still evaluated. Does nothing when the bundle
/// skips the rule engine.
///
/// # Returns
///
/// The wall-clock time spent.
pub fn apply_rule_engine<R: TrackerProgramRuleService + ?Sized>(
    service: &R,
    bundle: &mut TrackerBundle,
) -> Duration {
    let start: Instant = Instant::now();
    if bundle.skip_rule_engine {
        debug!("Rule engine skipped");
        return start.elapsed();
    }

    let mut failures: usize = 0;

    let mut enrollment_effects: RuleEffects = HashMap::new();
    for enrollment in &bundle.enrollments {
        match service.calculate_enrollment_effects(enrollment, bundle) {
            Ok(effects) if effects.is_empty() => {}
            Ok(effects) => {
                enrollment_effects.insert(enrollment.enrollment.clone(), effects);
            }
            Err(err) => {
                failures += 1;
                error!(enrollment = %enrollment.enrollment, %err, "Rule engine failed");
            }
        }
    }

    let mut event_effects: RuleEffects = HashMap::new();
    for event in &bundle.events {
        match service.calculate_event_effects(event, bundle) {
            Ok(effects) if effects.is_empty() => {}
            Ok(effects) => {
                event_effects.insert(event.event.clone(), effects);
            }
            Err(err) => {
                failures += 1;
                error!(event = %event.event, %err, "Rule engine failed");
            }
        }
    }

    info!(
        enrollments = enrollment_effects.len(),
        events = event_effects.len(),
        failures,
        "Rule engine complete"
    );

    bundle.enrollment_rule_effects = Arc::new(enrollment_effects);
    bundle.event_rule_effects = Arc::new(event_effects);
    start.elapsed()
}
