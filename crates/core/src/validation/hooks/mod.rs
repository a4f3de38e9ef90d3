// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Built-in validation hooks.
//!
//! The pre-check hooks run first and hide the objects they reject from
//! every later hook, so the remaining hooks may assume well-formed uids,
//! a consistent existence state, mandatory fields and resolvable metadata.

mod attribute;
mod category_option_combo;
mod data_values;
mod existence;
mod mandatory_fields;
mod meta;
mod notes;
mod reference;
mod rule_engine;
mod uid;

pub use attribute::AttributeValidationHook;
pub use category_option_combo::EventCategoryOptionComboValidationHook;
pub use data_values::DataValuesValidationHook;
pub use existence::PreCheckExistenceValidationHook;
pub use mandatory_fields::PreCheckMandatoryFieldsValidationHook;
pub use meta::PreCheckMetaValidationHook;
pub use notes::NotesValidationHook;
pub use reference::{PreCheckReferenceValidationHook, reject_orphans};
pub use rule_engine::{EnrollmentRuleValidationHook, EventRuleValidationHook};
pub use uid::PreCheckUidValidationHook;

use crate::validation::hook::TrackerValidationHook;
use crate::validation::reporter::ValidationErrorReporter;
use crate::validation::HookResult;
use std::ops::ControlFlow;
use tracker_domain::{FileResource, TrackerDto};
use tracker_report::TrackerErrorCode;

/// The general hook chain, in execution order.
#[must_use]
pub fn default_validation_hooks() -> Vec<Box<dyn TrackerValidationHook>> {
    vec![
        Box::new(PreCheckUidValidationHook),
        Box::new(PreCheckExistenceValidationHook),
        Box::new(PreCheckMandatoryFieldsValidationHook),
        Box::new(PreCheckMetaValidationHook),
        Box::new(PreCheckReferenceValidationHook),
        Box::new(AttributeValidationHook),
        Box::new(DataValuesValidationHook),
        Box::new(EventCategoryOptionComboValidationHook),
        Box::new(NotesValidationHook),
    ]
}

/// The hook chain run after the rule engine, in execution order.
#[must_use]
pub fn default_rule_engine_hooks() -> Vec<Box<dyn TrackerValidationHook>> {
    vec![
        Box::new(EnrollmentRuleValidationHook),
        Box::new(EventRuleValidationHook),
    ]
}

/// Checks a file-type value against the preheated file resources.
///
/// The file must exist and must not be linked to another value. A file
/// already linked to the stored value being updated is accepted.
fn validate_file_resource<T: TrackerDto + ?Sized>(
    reporter: &mut ValidationErrorReporter,
    dto: &T,
    file_resource: Option<&FileResource>,
    value: &str,
    stored_value: Option<&str>,
) -> HookResult {
    match file_resource {
        None => reporter.add_error_for(dto, TrackerErrorCode::E1084, &[value]),
        Some(file) if file.assigned && stored_value != Some(value) => {
            reporter.add_error_for(dto, TrackerErrorCode::E1009, &[value])
        }
        Some(_) => ControlFlow::Continue(()),
    }
}
