// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rule_engine::{RuleAction, RuleEffect, RuleEffects};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::debug;
use tracker_domain::{ProgramInstance, ProgramStageInstance, TrackerImportStrategy, TrackerType};

/// The persisted object a side effect is dispatched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffectObject {
    Enrollment(ProgramInstance),
    Event(ProgramStageInstance),
}

impl SideEffectObject {
    #[must_use]
    pub fn uid(&self) -> &str {
        match self {
            Self::Enrollment(enrollment) => &enrollment.uid,
            Self::Event(event) => &event.uid,
        }
    }

    #[must_use]
    pub const fn tracker_type(&self) -> TrackerType {
        match self {
            Self::Enrollment(_) => TrackerType::Enrollment,
            Self::Event(_) => TrackerType::Event,
        }
    }
}

/// Snapshot handed to side-effect handlers after an enrollment or event is
/// persisted.
#[derive(Debug, Clone)]
pub struct TrackerSideEffectDataBundle {
    pub object: SideEffectObject,
    pub enrollment_rule_effects: Arc<RuleEffects>,
    pub event_rule_effects: Arc<RuleEffects>,
    pub import_strategy: TrackerImportStrategy,
    /// Username of the acting user.
    pub accessed_by: Option<String>,
}

impl TrackerSideEffectDataBundle {
    /// Returns the rule effects computed for the persisted object.
    #[must_use]
    pub fn effects(&self) -> &[RuleEffect] {
        let effects: &RuleEffects = match self.object {
            SideEffectObject::Enrollment(_) => &self.enrollment_rule_effects,
            SideEffectObject::Event(_) => &self.event_rule_effects,
        };
        effects
            .get(self.object.uid())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A consumer of side-effect data bundles.
pub trait SideEffectHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Handles one persisted object. Failures are the handler's to log.
    fn handle_side_effect(&self, side_effect: &TrackerSideEffectDataBundle);
}

/// A notification requested by a program rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNotification {
    pub template: String,
    pub tracker_type: TrackerType,
    pub uid: String,
    /// `None` sends immediately.
    pub scheduled_at: Option<OffsetDateTime>,
}

/// Delivers notifications.
pub trait NotificationSink: Send + Sync {
    fn send(&self, notification: RuleNotification);
}

/// Forwards `SendMessage` and `ScheduleMessage` effects to a sink.
pub struct NotificationSideEffectHandler<N: NotificationSink> {
    sink: N,
}

impl<N: NotificationSink> NotificationSideEffectHandler<N> {
    #[must_use]
    pub const fn new(sink: N) -> Self {
        Self { sink }
    }
}

impl<N: NotificationSink> SideEffectHandler for NotificationSideEffectHandler<N> {
    fn name(&self) -> &'static str {
        "notification"
    }

    fn handle_side_effect(&self, side_effect: &TrackerSideEffectDataBundle) {
        for effect in side_effect.effects() {
            let (template, scheduled_at) = match &effect.action {
                RuleAction::SendMessage { template } => (template, None),
                RuleAction::ScheduleMessage {
                    template,
                    scheduled_at,
                } => (template, Some(*scheduled_at)),
                _ => continue,
            };
            debug!(
                rule = %effect.rule,
                uid = side_effect.object.uid(),
                "Dispatching rule notification"
            );
            self.sink.send(RuleNotification {
                template: template.clone(),
                tracker_type: side_effect.object.tracker_type(),
                uid: side_effect.object.uid().to_string(),
                scheduled_at,
            });
        }
    }
}
