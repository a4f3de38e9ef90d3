// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The tracker import pipeline up to the commit.
//!
//! A payload is turned into a [`TrackerBundle`], its references are resolved
//! into a [`TrackerPreheat`], the bundle is validated by the hook chain of
//! the [`TrackerValidationService`] and the program rule effects are
//! computed by [`apply_rule_engine`]. Persisting the surviving objects is
//! the job of the persistence layer, which uses the converters, bundle hooks
//! and side-effect handlers defined here.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bundle;
mod bundle_hook;
pub mod converter;
mod error;
mod identity;
pub mod preheat;
mod rule_engine;
mod side_effect;
pub mod validation;

#[cfg(test)]
mod tests;

pub use bundle::TrackerBundle;
pub use bundle_hook::TrackerBundleHook;
pub use error::CoreError;
pub use identity::IdentityService;
pub use preheat::{PreheatSource, ReferenceTrackerEntity, TrackerPreheat};
pub use rule_engine::{
    NoProgramRules, RuleAction, RuleEffect, RuleEffects, RuleEngineError,
    TrackerProgramRuleService, apply_rule_engine,
};
pub use side_effect::{
    NotificationSideEffectHandler, NotificationSink, RuleNotification, SideEffectHandler,
    SideEffectObject, TrackerSideEffectDataBundle,
};
pub use validation::{
    FailFast, HookResult, TrackerImportValidationContext, TrackerValidationHook,
    TrackerValidationService, ValidationConfig, ValidationErrorReporter,
};
