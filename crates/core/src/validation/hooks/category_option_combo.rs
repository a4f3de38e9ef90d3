// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::{
    HookResult, TrackerImportValidationContext, TrackerValidationHook, ValidationErrorReporter,
};
use std::ops::ControlFlow;
use tracing::warn;
use tracker_domain::{CategoryOptionCombo, Event};
use tracker_report::TrackerErrorCode;

/// Resolves the attribute option combo of each event (E1115).
///
/// The combo is taken from the explicit identifier, else from the attribute
/// category options, else the default combo. Resolutions are memoized in the
/// validation context by event uid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventCategoryOptionComboValidationHook;

impl TrackerValidationHook for EventCategoryOptionComboValidationHook {
    fn name(&self) -> &'static str {
        "event_category_option_combo"
    }

    fn validate_event(
        &self,
        reporter: &mut ValidationErrorReporter,
        context: &mut TrackerImportValidationContext<'_>,
        event: &Event,
    ) -> HookResult {
        if context
            .cached_event_category_option_combo(&event.event)
            .is_some()
        {
            return ControlFlow::Continue(());
        }

        let Some(combo) = context.preheat().attribute_option_combo(event) else {
            let requested: &str = event
                .attribute_option_combo
                .as_deref()
                .or(event.attribute_category_options.as_deref())
                .unwrap_or("default");
            return reporter.add_error_for(event, TrackerErrorCode::E1115, &[requested]);
        };

        let combo: &CategoryOptionCombo = combo;
        if let Err(err) = context.cache_event_category_option_combo(&event.event, combo) {
            warn!(event = %event.event, %err, "Could not memoize category option combo");
        }
        ControlFlow::Continue(())
    }
}
