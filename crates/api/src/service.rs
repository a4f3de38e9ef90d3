// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ApiError;
use crate::params::TrackerImportParams;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracker::preheat::preheat;
use tracker::{
    IdentityService, NoProgramRules, PreheatSource, TrackerBundle, TrackerProgramRuleService,
    TrackerValidationService, ValidationConfig, apply_rule_engine,
};
use tracker_domain::{AtomicMode, User};
use tracker_persistence::{CommitConfig, PersistenceError, TrackerCommitService, TrackerStore};
use tracker_report::{
    TrackerBundleReport, TrackerImportReport, TrackerTimingsStats, TrackerValidationReport,
};

/// Runs imports against one store.
///
/// The store doubles as the preheat source and the identity service, which
/// is what [`tracker_persistence::InMemoryStore`] provides.
#[derive(Debug)]
pub struct TrackerImportService<S: TrackerStore, R = NoProgramRules> {
    validation: TrackerValidationService,
    program_rules: R,
    committer: TrackerCommitService<S>,
}

impl<S> TrackerImportService<S, NoProgramRules>
where
    S: TrackerStore + PreheatSource<Error = PersistenceError> + IdentityService,
{
    /// An import service with the built-in hook chains, no program rules and
    /// no commit collaborators.
    #[must_use]
    pub fn with_defaults(store: S) -> Self {
        Self::new(
            store,
            NoProgramRules,
            ValidationConfig::default(),
            CommitConfig::default(),
        )
    }
}

impl<S, R> TrackerImportService<S, R>
where
    S: TrackerStore + PreheatSource<Error = PersistenceError> + IdentityService,
    R: TrackerProgramRuleService,
{
    /// Creates an import service.
    ///
    /// # Arguments
    ///
    /// * `store` - Source of reference data and users, and commit target
    /// * `program_rules` - The rule engine evaluated after validation
    /// * `validation` - The general and rule-engine hook chains
    /// * `commit` - Bundle hooks and side-effect handlers
    #[must_use]
    pub const fn new(
        store: S,
        program_rules: R,
        validation: ValidationConfig,
        commit: CommitConfig,
    ) -> Self {
        Self {
            validation: TrackerValidationService::new(validation),
            program_rules,
            committer: TrackerCommitService::new(store, commit),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        self.committer.store()
    }

    /// Imports one payload.
    ///
    /// Invalid objects are dropped from the bundle and reported, and the rest
    /// is committed. With `AtomicMode::All` any validation error prevents the
    /// commit entirely; `VALIDATE` imports never commit.
    ///
    /// # Arguments
    ///
    /// * `params` - The payload and its import flags
    ///
    /// # Returns
    ///
    /// The import report, with status `ERROR` when any validation error was
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Preheat`] if reference data cannot be read and
    /// [`ApiError::Commit`] if the commit was rolled back.
    pub fn import(&self, params: TrackerImportParams) -> Result<TrackerImportReport, ApiError> {
        let start: Instant = Instant::now();
        let submitted: usize = params.size();
        let user: Option<User> = self.resolve_user(&params);
        let mut bundle: TrackerBundle = params.into_bundle(user);
        info!(
            user = bundle.username(),
            objects = submitted,
            import_mode = %bundle.import_mode,
            import_strategy = %bundle.import_strategy,
            "Starting import"
        );

        let mut timings: TrackerTimingsStats = TrackerTimingsStats::default();

        let phase: Instant = Instant::now();
        bundle.preheat = preheat(self.store(), &bundle).map_err(ApiError::Preheat)?;
        bundle.resolve_strategies();
        timings.preheat = phase.elapsed();

        let phase: Instant = Instant::now();
        let mut report: TrackerValidationReport = self.validation.validate(&mut bundle);
        timings.validation = phase.elapsed();

        if !bundle.skip_rule_engine {
            timings.program_rule = apply_rule_engine(&self.program_rules, &mut bundle);

            let phase: Instant = Instant::now();
            let rule_engine_report: TrackerValidationReport =
                self.validation.validate_rule_engine(&mut bundle);
            report.merge(rule_engine_report);
            timings.validation += phase.elapsed();
        }

        let phase: Instant = Instant::now();
        let bundle_report: TrackerBundleReport = if bundle.atomic_mode == AtomicMode::All
            && report.has_errors()
        {
            info!(
                errors = report.errors.len(),
                "Atomic import has validation errors, nothing committed"
            );
            TrackerBundleReport::new()
        } else {
            self.committer
                .commit(&mut bundle)
                .map_err(ApiError::Commit)?
        };
        timings.commit = phase.elapsed();
        timings.total = start.elapsed();

        let import_report: TrackerImportReport =
            TrackerImportReport::new(report, bundle_report, timings, submitted);
        info!(
            status = ?import_report.status,
            created = import_report.stats.created,
            updated = import_report.stats.updated,
            deleted = import_report.stats.deleted,
            ignored = import_report.stats.ignored,
            total_ms = duration_ms(timings.total),
            "Import complete"
        );
        Ok(import_report)
    }

    /// Resolves the acting user.
    ///
    /// An explicit user is reloaded by uid and is `None` if unknown. Without
    /// one, `user_id` is looked up, falling back to the current session user.
    fn resolve_user(&self, params: &TrackerImportParams) -> Option<User> {
        if let Some(user) = &params.user {
            debug!(uid = %user.uid, "Reloading explicit import user");
            return self.store().user_by_uid(&user.uid);
        }
        if let Some(uid) = params.user_id.as_deref() {
            debug!(uid, "Loading import user by uid");
            if let Some(user) = self.store().user_by_uid(uid) {
                return Some(user);
            }
        }
        self.store().current_user()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
