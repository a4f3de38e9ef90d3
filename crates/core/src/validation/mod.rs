// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of a preheated bundle by an ordered chain of hooks.

mod context;
mod hook;
pub mod hooks;
mod reporter;
mod service;

pub use context::TrackerImportValidationContext;
pub use hook::{FailFast, HookResult, TrackerValidationHook};
pub use reporter::ValidationErrorReporter;
pub use service::{TrackerValidationService, ValidationConfig};
