// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The bundle commit engine.
//!
//! A bundle is committed in one transaction, one tracker type at a time in
//! the order tracked entities, enrollments, events, relationships. Later
//! types reference earlier ones, and every persisted object is registered
//! in the preheat so the next type can resolve it.

use crate::error::PersistenceError;
use crate::reconcile::{reconcile_attributes, reconcile_data_values};
use crate::store::{StoredObject, TrackerSession, TrackerStore};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use tracker::converter;
use tracker::{
    CoreError, SideEffectHandler, SideEffectObject, TrackerBundle, TrackerBundleHook,
    TrackerSideEffectDataBundle,
};
use tracker_domain::{
    Enrollment, Event, FlushMode, ProgramInstance, ProgramOwner, ProgramStageInstance,
    Relationship, RelationshipInstance, TrackedEntity, TrackedEntityComment,
    TrackedEntityInstance, TrackerBundleMode, TrackerImportStrategy, TrackerType,
};
use tracker_report::{TrackerBundleReport, TrackerObjectReport, TrackerStats, TrackerTypeReport};

/// The collaborators invoked while committing.
#[derive(Default)]
pub struct CommitConfig {
    /// Lifecycle hooks, run in order.
    pub bundle_hooks: Vec<Box<dyn TrackerBundleHook>>,
    /// Handlers receiving every created or updated enrollment and event.
    pub side_effect_handlers: Vec<Box<dyn SideEffectHandler>>,
}

impl std::fmt::Debug for CommitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks: Vec<&'static str> = self.bundle_hooks.iter().map(|hook| hook.name()).collect();
        let handlers: Vec<&'static str> = self
            .side_effect_handlers
            .iter()
            .map(|handler| handler.name())
            .collect();
        f.debug_struct("CommitConfig")
            .field("bundle_hooks", &hooks)
            .field("side_effect_handlers", &handlers)
            .finish()
    }
}

/// Commits validated bundles to a [`TrackerStore`].
#[derive(Debug)]
pub struct TrackerCommitService<S: TrackerStore> {
    store: S,
    config: CommitConfig,
}

impl<S: TrackerStore> TrackerCommitService<S> {
    #[must_use]
    pub const fn new(store: S, config: CommitConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persists every object left in `bundle`.
    ///
    /// A bundle in `VALIDATE` mode is not committed and yields an empty
    /// report. Otherwise the four tracker types are persisted in one
    /// transaction, which is rolled back on the first error.
    ///
    /// # Arguments
    ///
    /// * `bundle` - A validated bundle; persisted objects are registered in
    ///   its preheat
    ///
    /// # Returns
    ///
    /// The per-type counters and object reports of the commit.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a hook, a converter or the store.
    /// Nothing is persisted in that case.
    pub fn commit(
        &self,
        bundle: &mut TrackerBundle,
    ) -> Result<TrackerBundleReport, PersistenceError> {
        if bundle.import_mode == TrackerBundleMode::Validate {
            debug!("Bundle is validate-only, skipping commit");
            return Ok(TrackerBundleReport::new());
        }

        let mut session = self.store.begin()?;
        match self.commit_bundle(&mut session, bundle) {
            Ok(report) => {
                session.clear();
                session.commit()?;
                self.store.clear_cache();

                let stats: TrackerStats = report.stats();
                info!(
                    created = stats.created,
                    updated = stats.updated,
                    deleted = stats.deleted,
                    ignored = stats.ignored,
                    "Bundle committed"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(%err, "Commit failed, rolling back");
                session.rollback();
                Err(err)
            }
        }
    }

    fn commit_bundle<T: TrackerSession>(
        &self,
        session: &mut T,
        bundle: &mut TrackerBundle,
    ) -> Result<TrackerBundleReport, PersistenceError> {
        let now: OffsetDateTime = OffsetDateTime::now_utc();

        for hook in &self.config.bundle_hooks {
            hook.pre_commit(bundle)?;
        }

        let mut report: TrackerBundleReport = TrackerBundleReport::new();
        report.put_type_report(self.commit_tracked_entities(session, bundle, now)?);
        report.put_type_report(self.commit_enrollments(session, bundle, now)?);
        report.put_type_report(self.commit_events(session, bundle, now)?);
        report.put_type_report(self.commit_relationships(session, bundle, now)?);

        for hook in &self.config.bundle_hooks {
            hook.post_commit(bundle)?;
        }
        Ok(report)
    }

    fn commit_tracked_entities<T: TrackerSession>(
        &self,
        session: &mut T,
        bundle: &mut TrackerBundle,
        now: OffsetDateTime,
    ) -> Result<TrackerTypeReport, PersistenceError> {
        let tracker_type: TrackerType = TrackerType::TrackedEntity;
        let mut type_report: TrackerTypeReport = TrackerTypeReport::new(tracker_type);
        self.pre_create(session, tracker_type, bundle)?;

        let username: Option<String> = bundle.username().map(str::to_string);
        let tracked_entities: Vec<TrackedEntity> = bundle.tracked_entities.clone();
        for (index, tracked_entity) in tracked_entities.iter().enumerate() {
            let strategy: TrackerImportStrategy = bundle.strategy_for(tracked_entity);
            let existed: bool = bundle
                .preheat
                .tracked_entity(&tracked_entity.tracked_entity)
                .is_some();

            let uid: &str = &tracked_entity.tracked_entity;
            let mut instance: TrackedEntityInstance = if strategy.is_delete() {
                stored_instance(bundle.preheat.tracked_entity(uid), tracker_type, uid)?
            } else {
                converter::to_tracked_entity_instance(&bundle.preheat, tracked_entity, now)?
            };
            instance.last_updated = Some(now);
            instance.last_updated_at_client = Some(now);
            instance.last_updated_by.clone_from(&username);
            instance.deleted = strategy.is_delete();
            type_report.add_object_report(TrackerObjectReport::new(
                tracker_type,
                &instance.uid,
                index,
            ));

            session.save(StoredObject::TrackedEntity(instance.clone()))?;
            if !strategy.is_delete() {
                reconcile_attributes(
                    session,
                    &mut bundle.preheat,
                    &mut instance,
                    &tracked_entity.attributes,
                    username.as_deref(),
                    now,
                )?;
            }
            debug!(uid = %instance.uid, ?strategy, "Persisted tracked entity");
            bundle.preheat.put_tracked_entity(instance);

            flush_object(session, bundle.flush_mode)?;
            count(&mut type_report.stats, strategy, existed);
        }

        self.post_create(session, tracker_type, bundle)?;
        Ok(type_report)
    }

    fn commit_enrollments<T: TrackerSession>(
        &self,
        session: &mut T,
        bundle: &mut TrackerBundle,
        now: OffsetDateTime,
    ) -> Result<TrackerTypeReport, PersistenceError> {
        let tracker_type: TrackerType = TrackerType::Enrollment;
        let mut type_report: TrackerTypeReport = TrackerTypeReport::new(tracker_type);
        self.pre_create(session, tracker_type, bundle)?;

        let username: Option<String> = bundle.username().map(str::to_string);
        let enrollments: Vec<Enrollment> = bundle.enrollments.clone();
        for (index, enrollment) in enrollments.iter().enumerate() {
            let strategy: TrackerImportStrategy = bundle.strategy_for(enrollment);
            let existed: bool = bundle.preheat.enrollment(&enrollment.enrollment).is_some();

            let uid: &str = &enrollment.enrollment;
            let mut instance: ProgramInstance = if strategy.is_delete() {
                stored_instance(bundle.preheat.enrollment(uid), tracker_type, uid)?
            } else {
                converter::to_program_instance(&bundle.preheat, enrollment, now)?
            };
            instance.last_updated = Some(now);
            instance.last_updated_at_client = Some(now);
            instance.last_updated_by.clone_from(&username);
            instance.deleted = strategy.is_delete();
            type_report.add_object_report(TrackerObjectReport::new(
                tracker_type,
                &instance.uid,
                index,
            ));

            if !strategy.is_delete() {
                let comments: Vec<TrackedEntityComment> = converter::to_comments(
                    &bundle.preheat,
                    &enrollment.notes,
                    username.as_deref(),
                    now,
                );
                instance
                    .comments
                    .extend(save_comments(session, bundle, comments)?);
            }
            session.save(StoredObject::Enrollment(instance.clone()))?;

            if !strategy.is_delete() {
                if !existed {
                    save_program_owner(session, bundle, &instance)?;
                }
                if !enrollment.attributes.is_empty() {
                    let mut tracked_entity: TrackedEntityInstance = bundle
                        .preheat
                        .tracked_entity(&enrollment.tracked_entity)
                        .cloned()
                        .ok_or_else(|| CoreError::MissingReference {
                            tracker_type: TrackerType::TrackedEntity,
                            uid: enrollment.tracked_entity.clone(),
                        })?;
                    reconcile_attributes(
                        session,
                        &mut bundle.preheat,
                        &mut tracked_entity,
                        &enrollment.attributes,
                        username.as_deref(),
                        now,
                    )?;
                    bundle.preheat.put_tracked_entity(tracked_entity);
                }
            }
            debug!(uid = %instance.uid, ?strategy, "Persisted enrollment");
            bundle.preheat.put_enrollment(instance.clone());

            flush_object(session, bundle.flush_mode)?;
            count(&mut type_report.stats, strategy, existed);
            self.dispatch_side_effects(bundle, SideEffectObject::Enrollment(instance), strategy);
        }

        self.post_create(session, tracker_type, bundle)?;
        Ok(type_report)
    }

    fn commit_events<T: TrackerSession>(
        &self,
        session: &mut T,
        bundle: &mut TrackerBundle,
        now: OffsetDateTime,
    ) -> Result<TrackerTypeReport, PersistenceError> {
        let tracker_type: TrackerType = TrackerType::Event;
        let mut type_report: TrackerTypeReport = TrackerTypeReport::new(tracker_type);
        self.pre_create(session, tracker_type, bundle)?;

        let username: Option<String> = bundle.username().map(str::to_string);
        let events: Vec<Event> = bundle.events.clone();
        for (index, event) in events.iter().enumerate() {
            let strategy: TrackerImportStrategy = bundle.strategy_for(event);
            let existed: bool = bundle.preheat.event(&event.event).is_some();

            let uid: &str = &event.event;
            let mut instance: ProgramStageInstance = if strategy.is_delete() {
                stored_instance(bundle.preheat.event(uid), tracker_type, uid)?
            } else {
                converter::to_program_stage_instance(&bundle.preheat, event, now)?
            };
            instance.last_updated = Some(now);
            instance.last_updated_at_client = Some(now);
            instance.last_updated_by.clone_from(&username);
            instance.deleted = strategy.is_delete();
            type_report.add_object_report(TrackerObjectReport::new(
                tracker_type,
                &instance.uid,
                index,
            ));

            if !strategy.is_delete() {
                let comments: Vec<TrackedEntityComment> = converter::to_comments(
                    &bundle.preheat,
                    &event.notes,
                    username.as_deref(),
                    now,
                );
                instance
                    .comments
                    .extend(save_comments(session, bundle, comments)?);
            }
            session.save(StoredObject::Event(instance.clone()))?;

            if !strategy.is_delete() {
                reconcile_data_values(
                    session,
                    &mut bundle.preheat,
                    &mut instance,
                    &event.data_values,
                    username.as_deref(),
                    now,
                )?;
                if let Some(enrollment) = &instance.program_instance {
                    bundle.preheat.add_enrollment_with_events(enrollment.clone());
                    bundle
                        .preheat
                        .add_program_stage_with_events(&instance.program_stage, enrollment);
                }
            }
            debug!(uid = %instance.uid, ?strategy, "Persisted event");
            bundle.preheat.put_event(instance.clone());

            flush_object(session, bundle.flush_mode)?;
            count(&mut type_report.stats, strategy, existed);
            self.dispatch_side_effects(bundle, SideEffectObject::Event(instance), strategy);
        }

        self.post_create(session, tracker_type, bundle)?;
        Ok(type_report)
    }

    /// Relationships are immutable: one that already exists is only ever
    /// deleted, and is otherwise counted as ignored.
    fn commit_relationships<T: TrackerSession>(
        &self,
        session: &mut T,
        bundle: &mut TrackerBundle,
        now: OffsetDateTime,
    ) -> Result<TrackerTypeReport, PersistenceError> {
        let tracker_type: TrackerType = TrackerType::Relationship;
        let mut type_report: TrackerTypeReport = TrackerTypeReport::new(tracker_type);
        self.pre_create(session, tracker_type, bundle)?;

        let username: Option<String> = bundle.username().map(str::to_string);
        let relationships: Vec<Relationship> = bundle.relationships.clone();
        for (index, relationship) in relationships.iter().enumerate() {
            let strategy: TrackerImportStrategy = bundle.strategy_for(relationship);
            let existed: bool = bundle
                .preheat
                .relationship(&relationship.relationship)
                .is_some();

            let uid: &str = &relationship.relationship;
            let mut instance: RelationshipInstance = if strategy.is_delete() {
                stored_instance(bundle.preheat.relationship(uid), tracker_type, uid)?
            } else {
                converter::to_relationship_instance(&bundle.preheat, relationship, now)?
            };
            type_report.add_object_report(TrackerObjectReport::new(
                tracker_type,
                &instance.uid,
                index,
            ));

            if existed && !strategy.is_delete() {
                debug!(uid = %instance.uid, "Relationship already exists, ignoring");
                type_report.stats.inc_ignored();
                continue;
            }

            instance.last_updated = Some(now);
            instance.last_updated_by.clone_from(&username);
            instance.deleted = strategy.is_delete();
            session.save(StoredObject::Relationship(instance.clone()))?;
            debug!(uid = %instance.uid, ?strategy, "Persisted relationship");
            bundle.preheat.put_relationship(instance);

            flush_object(session, bundle.flush_mode)?;
            count(&mut type_report.stats, strategy, existed);
        }

        self.post_create(session, tracker_type, bundle)?;
        Ok(type_report)
    }

    fn pre_create<T: TrackerSession>(
        &self,
        session: &mut T,
        tracker_type: TrackerType,
        bundle: &TrackerBundle,
    ) -> Result<(), PersistenceError> {
        for hook in &self.config.bundle_hooks {
            hook.pre_create(tracker_type, bundle)?;
        }
        session.flush()
    }

    fn post_create<T: TrackerSession>(
        &self,
        session: &mut T,
        tracker_type: TrackerType,
        bundle: &TrackerBundle,
    ) -> Result<(), PersistenceError> {
        session.flush()?;
        for hook in &self.config.bundle_hooks {
            hook.post_create(tracker_type, bundle)?;
        }
        Ok(())
    }

    fn dispatch_side_effects(
        &self,
        bundle: &TrackerBundle,
        object: SideEffectObject,
        strategy: TrackerImportStrategy,
    ) {
        if bundle.skip_side_effects
            || strategy.is_delete()
            || self.config.side_effect_handlers.is_empty()
        {
            return;
        }

        let side_effect: TrackerSideEffectDataBundle = TrackerSideEffectDataBundle {
            object,
            enrollment_rule_effects: Arc::clone(&bundle.enrollment_rule_effects),
            event_rule_effects: Arc::clone(&bundle.event_rule_effects),
            import_strategy: strategy,
            accessed_by: bundle.username().map(str::to_string),
        };
        for handler in &self.config.side_effect_handlers {
            debug!(
                handler = handler.name(),
                uid = side_effect.object.uid(),
                "Dispatching side effect"
            );
            handler.handle_side_effect(&side_effect);
        }
    }
}

fn flush_object<T: TrackerSession>(
    session: &mut T,
    flush_mode: FlushMode,
) -> Result<(), PersistenceError> {
    if flush_mode == FlushMode::Object {
        session.flush()?;
    }
    Ok(())
}

/// Returns the stored copy of an object being deleted. Deletes only flag
/// the stored object and never read the rest of the payload.
fn stored_instance<M: Clone>(
    stored: Option<&M>,
    tracker_type: TrackerType,
    uid: &str,
) -> Result<M, CoreError> {
    stored.cloned().ok_or_else(|| CoreError::MissingReference {
        tracker_type,
        uid: uid.to_string(),
    })
}

const fn count(stats: &mut TrackerStats, strategy: TrackerImportStrategy, existed: bool) {
    if strategy.is_delete() {
        stats.inc_deleted();
    } else if existed {
        stats.inc_updated();
    } else {
        stats.inc_created();
    }
}

/// Stages `comments` and registers them in the preheat, returning their
/// uids.
fn save_comments<T: TrackerSession>(
    session: &mut T,
    bundle: &mut TrackerBundle,
    comments: Vec<TrackedEntityComment>,
) -> Result<Vec<String>, PersistenceError> {
    let mut uids: Vec<String> = Vec::with_capacity(comments.len());
    for comment in comments {
        uids.push(comment.uid.clone());
        session.save(StoredObject::Comment(comment.clone()))?;
        bundle.preheat.put_note(comment);
    }
    Ok(uids)
}

/// Makes the enrolling org unit the owner of the tracked entity within the
/// program, unless an owner exists already.
fn save_program_owner<T: TrackerSession>(
    session: &mut T,
    bundle: &mut TrackerBundle,
    enrollment: &ProgramInstance,
) -> Result<(), PersistenceError> {
    let Some(tracked_entity) = &enrollment.tracked_entity else {
        return Ok(());
    };
    if bundle
        .preheat
        .program_owner(tracked_entity, &enrollment.program)
        .is_some()
    {
        return Ok(());
    }

    let owner: ProgramOwner = ProgramOwner {
        tracked_entity: tracked_entity.clone(),
        program: enrollment.program.clone(),
        organisation_unit: enrollment.organisation_unit.clone(),
    };
    session.save(StoredObject::ProgramOwner(owner.clone()))?;
    bundle.preheat.put_program_owner(owner);
    Ok(())
}
