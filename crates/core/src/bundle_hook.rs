// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::TrackerBundle;
use crate::error::CoreError;
use tracker_domain::TrackerType;

/// Lifecycle callbacks invoked by the commit engine.
///
/// Every callback defaults to a no-op. An error aborts the commit and rolls
/// the transaction back.
pub trait TrackerBundleHook: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs once before anything is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the commit.
    fn pre_commit(&self, _bundle: &TrackerBundle) -> Result<(), CoreError> {
        Ok(())
    }

    /// Runs once after all four tracker types are persisted.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the commit.
    fn post_commit(&self, _bundle: &TrackerBundle) -> Result<(), CoreError> {
        Ok(())
    }

    /// Runs before the objects of `tracker_type` are persisted.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the commit.
    fn pre_create(
        &self,
        _tracker_type: TrackerType,
        _bundle: &TrackerBundle,
    ) -> Result<(), CoreError> {
        Ok(())
    }

    /// Runs after the objects of `tracker_type` are persisted and flushed.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the commit.
    fn post_create(
        &self,
        _tracker_type: TrackerType,
        _bundle: &TrackerBundle,
    ) -> Result<(), CoreError> {
        Ok(())
    }
}
