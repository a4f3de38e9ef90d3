// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::hooks::validate_file_resource;
use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{
    Attribute, Enrollment, TrackedEntity, TrackedEntityAttribute, TrackedEntityInstance, TrackerDto,
};
use tracker_report::TrackerErrorCode;

/// Checks tracked entity and enrollment attribute values.
///
/// Every attribute must exist (E1006). File-type values must reference a
/// known file resource (E1084) that is not linked elsewhere (E1009).
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeValidationHook;

fn validate_attributes<T: TrackerDto>(
    reporter: &mut ValidationErrorReporter,
    context: &TrackerImportValidationContext<'_>,
    dto: &T,
    attributes: &[Attribute],
    stored: Option<&TrackedEntityInstance>,
) -> HookResult {
    for attribute in attributes {
        let Some(metadata) = context.tracked_entity_attribute(&attribute.attribute) else {
            reporter.add_error_for(dto, TrackerErrorCode::E1006, &[&attribute.attribute])?;
            continue;
        };
        validate_value(reporter, context, dto, metadata, attribute, stored)?;
    }
    ControlFlow::Continue(())
}

fn validate_value<T: TrackerDto>(
    reporter: &mut ValidationErrorReporter,
    context: &TrackerImportValidationContext<'_>,
    dto: &T,
    metadata: &TrackedEntityAttribute,
    attribute: &Attribute,
    stored: Option<&TrackedEntityInstance>,
) -> HookResult {
    let Some(value) = attribute
        .non_empty_value()
        .filter(|_| metadata.value_type.is_file_type())
    else {
        return ControlFlow::Continue(());
    };

    let stored_value: Option<&str> = stored.and_then(|tracked_entity| {
        tracked_entity
            .attribute_values
            .iter()
            .find(|stored| stored.attribute == metadata.uid)
            .map(|stored| stored.value.as_str())
    });
    validate_file_resource(
        reporter,
        dto,
        context.file_resource(value),
        value,
        stored_value,
    )
}

impl TrackerValidationHook for AttributeValidationHook {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn validate_tracked_entity(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) -> HookResult {
        let stored: Option<&TrackedEntityInstance> =
            context.tracked_entity_instance(&tracked_entity.tracked_entity);
        validate_attributes(
            reporter,
            context,
            tracked_entity,
            &tracked_entity.attributes,
            stored,
        )
    }

    fn validate_enrollment(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        enrollment: &Enrollment,
    ) -> HookResult {
        let stored: Option<&TrackedEntityInstance> =
            context.tracked_entity_instance(&enrollment.tracked_entity);
        validate_attributes(
            reporter,
            context,
            enrollment,
            &enrollment.attributes,
            stored,
        )
    }
}
