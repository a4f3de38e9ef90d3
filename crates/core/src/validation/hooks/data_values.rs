// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::hooks::validate_file_resource;
use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracker_domain::{DataElement, Event, ProgramStageInstance};
use tracker_report::TrackerErrorCode;

/// Checks event data values.
///
/// Every data element must exist (E1304). File-type values follow the same
/// file resource rules as attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataValuesValidationHook;

impl TrackerValidationHook for DataValuesValidationHook {
    fn name(&self) -> &'static str {
        "data_values"
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        let stored: Option<&ProgramStageInstance> = context.program_stage_instance(&event.event);

        for data_value in &event.data_values {
            let Some(data_element) = context.data_element(&data_value.data_element) else {
                reporter.add_error_for(
                    event,
                    TrackerErrorCode::E1304,
                    &[&data_value.data_element],
                )?;
                continue;
            };

            let Some(value) = data_value
                .non_empty_value()
                .filter(|_| data_element.value_type.is_file_type())
            else {
                continue;
            };

            validate_file_resource(
                reporter,
                event,
                context.file_resource(value),
                value,
                stored_value(stored, data_element),
            )?;
        }
        ControlFlow::Continue(())
    }
}

fn stored_value<'a>(
    stored: Option<&'a ProgramStageInstance>,
    data_element: &DataElement,
) -> Option<&'a str> {
    stored?
        .event_data_values
        .iter()
        .find(|value| value.data_element == data_element.uid)
        .map(|value| value.value.as_str())
}
