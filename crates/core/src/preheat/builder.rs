// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::TrackerBundle;
use crate::preheat::{
    TrackerIdentifierCollector, TrackerPreheat, scheme_for, split_category_options,
};
use std::collections::BTreeSet;
use tracing::{debug, info};
use tracker_domain::{
    Attribute, CategoryOptionCombo, MetadataKind, MetadataObject, ProgramInstance, ProgramOwner,
    ProgramStageInstance, RelationshipInstance, TrackedEntityComment, TrackedEntityInstance,
    TrackerIdSchemeParam, TrackerType, User,
};

/// Storage queries the preheat is built from.
///
/// Every method is a bulk lookup over a set of identifiers. Lookups of
/// tracker objects must include soft-deleted objects.
pub trait PreheatSource {
    /// The error type of the underlying storage.
    type Error: std::error::Error;

    /// Finds metadata of `kind` whose identifier under `scheme` is one of
    /// `identifiers`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_metadata(
        &self,
        kind: MetadataKind,
        scheme: &TrackerIdSchemeParam,
        identifiers: &BTreeSet<String>,
    ) -> Result<Vec<MetadataObject>, Self::Error>;

    /// Finds the combo made of exactly `category_options` (uids).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_category_option_combo(
        &self,
        category_options: &BTreeSet<String>,
    ) -> Result<Option<CategoryOptionCombo>, Self::Error>;

    /// Finds the system default category option combo.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_default_category_option_combo(
        &self,
    ) -> Result<Option<CategoryOptionCombo>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_tracked_entities(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<TrackedEntityInstance>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_enrollments(&self, uids: &BTreeSet<String>)
    -> Result<Vec<ProgramInstance>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_events(&self, uids: &BTreeSet<String>)
    -> Result<Vec<ProgramStageInstance>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_relationships(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<RelationshipInstance>, Self::Error>;

    /// Finds the program owners of the given tracked entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_program_owners(
        &self,
        tracked_entities: &BTreeSet<String>,
    ) -> Result<Vec<ProgramOwner>, Self::Error>;

    /// Returns the subset of `enrollments` with at least one non-deleted
    /// event.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_enrollments_with_events(
        &self,
        enrollments: &BTreeSet<String>,
    ) -> Result<Vec<String>, Self::Error>;

    /// Returns the `(program stage, enrollment)` pairs with at least one
    /// non-deleted event, for the given enrollments.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_program_stages_with_events(
        &self,
        enrollments: &BTreeSet<String>,
    ) -> Result<Vec<(String, String)>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_users(&self, usernames: &BTreeSet<String>) -> Result<Vec<User>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn find_notes(&self, uids: &BTreeSet<String>)
    -> Result<Vec<TrackedEntityComment>, Self::Error>;
}

/// Builds the preheat of `bundle` from `source`.
///
/// Identifiers are collected in one pass over the payload, then resolved in
/// bulk. The returned preheat is complete: validation and commit never go
/// back to storage for reads.
///
/// # Arguments
///
/// * `source` - The storage to resolve identifiers against
/// * `bundle` - The bundle whose payload lists are scanned
///
/// # Errors
///
/// Returns the first storage error raised by `source`.
pub fn preheat<S: PreheatSource>(
    source: &S,
    bundle: &TrackerBundle,
) -> Result<TrackerPreheat, S::Error> {
    let collector: TrackerIdentifierCollector = TrackerIdentifierCollector::collect(bundle);
    let mut preheat: TrackerPreheat = TrackerPreheat::new(bundle.identifiers.clone());

    for kind in collector.metadata_kinds() {
        let Some(identifiers) = collector.metadata(kind) else {
            continue;
        };
        let scheme: TrackerIdSchemeParam = scheme_for(kind, &bundle.identifiers);
        let objects: Vec<MetadataObject> = source.find_metadata(kind, &scheme, identifiers)?;
        debug!(
            ?kind,
            requested = identifiers.len(),
            found = objects.len(),
            "Preheated metadata"
        );
        for object in objects {
            preheat.put_object(&scheme, object);
        }
    }

    preheat_file_resources(source, bundle, &mut preheat)?;
    preheat_category_option_combos(source, bundle, &mut preheat)?;

    if let Some(combo) = source.find_default_category_option_combo()? {
        preheat.set_default_category_option_combo(combo);
    }

    let tracked_entity_uids: BTreeSet<String> =
        collector.tracker_uids(TrackerType::TrackedEntity);
    let enrollment_uids: BTreeSet<String> = collector.tracker_uids(TrackerType::Enrollment);

    for tracked_entity in source.find_tracked_entities(&tracked_entity_uids)? {
        preheat.put_tracked_entity(tracked_entity);
    }
    for enrollment in source.find_enrollments(&enrollment_uids)? {
        preheat.put_enrollment(enrollment);
    }
    for event in source.find_events(&collector.tracker_uids(TrackerType::Event))? {
        preheat.put_event(event);
    }
    for relationship in
        source.find_relationships(&collector.tracker_uids(TrackerType::Relationship))?
    {
        preheat.put_relationship(relationship);
    }

    for owner in source.find_program_owners(&tracked_entity_uids)? {
        preheat.put_program_owner(owner);
    }
    for enrollment in source.find_enrollments_with_events(&enrollment_uids)? {
        preheat.add_enrollment_with_events(enrollment);
    }
    for (program_stage, enrollment) in source.find_program_stages_with_events(&enrollment_uids)? {
        preheat.add_program_stage_with_events(program_stage, enrollment);
    }

    let mut usernames: BTreeSet<String> = collector.usernames().clone();
    if let Some(username) = bundle.username() {
        usernames.insert(username.to_string());
    }
    for user in source.find_users(&usernames)? {
        preheat.put_user(user);
    }
    for note in source.find_notes(collector.notes())? {
        preheat.put_note(note);
    }

    for tracked_entity in &bundle.tracked_entities {
        preheat.put_reference(&tracked_entity.tracked_entity, None);
    }
    for enrollment in &bundle.enrollments {
        preheat.put_reference(
            &enrollment.enrollment,
            Some(enrollment.tracked_entity.clone()).filter(|uid| !uid.is_empty()),
        );
    }
    for event in &bundle.events {
        preheat.put_reference(&event.event, event.enrollment.clone());
    }
    for relationship in &bundle.relationships {
        preheat.put_reference(&relationship.relationship, None);
    }

    info!(
        tracked_entities = bundle.tracked_entities.len(),
        enrollments = bundle.enrollments.len(),
        events = bundle.events.len(),
        relationships = bundle.relationships.len(),
        "Preheat complete"
    );

    Ok(preheat)
}

/// Resolves the file resources referenced by file-type values.
fn preheat_file_resources<S: PreheatSource>(
    source: &S,
    bundle: &TrackerBundle,
    preheat: &mut TrackerPreheat,
) -> Result<(), S::Error> {
    let mut uids: BTreeSet<String> = BTreeSet::new();

    let attributes = bundle
        .tracked_entities
        .iter()
        .flat_map(|tracked_entity| tracked_entity.attributes.iter())
        .chain(
            bundle
                .enrollments
                .iter()
                .flat_map(|enrollment| enrollment.attributes.iter()),
        );
    for attribute in attributes {
        if let Some(value) = file_attribute_value(preheat, attribute) {
            uids.insert(value.to_string());
        }
    }

    for data_value in bundle.events.iter().flat_map(|event| event.data_values.iter()) {
        let is_file: bool = preheat
            .data_element(&data_value.data_element)
            .is_some_and(|element| element.value_type.is_file_type());
        if let Some(value) = data_value.non_empty_value().filter(|_| is_file) {
            uids.insert(value.to_string());
        }
    }

    if uids.is_empty() {
        return Ok(());
    }

    for object in source.find_metadata(
        MetadataKind::FileResource,
        &TrackerIdSchemeParam::UID,
        &uids,
    )? {
        preheat.put_object(&TrackerIdSchemeParam::UID, object);
    }
    Ok(())
}

fn file_attribute_value<'a>(preheat: &TrackerPreheat, attribute: &'a Attribute) -> Option<&'a str> {
    let is_file: bool = preheat
        .tracked_entity_attribute(&attribute.attribute)
        .is_some_and(|metadata| metadata.value_type.is_file_type());
    attribute.non_empty_value().filter(|_| is_file)
}

/// Resolves combos of events that name their attribute category options
/// instead of an attribute option combo.
fn preheat_category_option_combos<S: PreheatSource>(
    source: &S,
    bundle: &TrackerBundle,
    preheat: &mut TrackerPreheat,
) -> Result<(), S::Error> {
    for event in &bundle.events {
        if event
            .attribute_option_combo
            .as_deref()
            .is_some_and(|combo| !combo.is_empty())
        {
            continue;
        }
        let Some(options) = event.attribute_category_options.as_deref() else {
            continue;
        };

        let uids: Option<BTreeSet<String>> = split_category_options(options)
            .map(|identifier| {
                preheat
                    .category_option(identifier)
                    .map(|option| option.uid.clone())
            })
            .collect();
        let Some(uids) = uids.filter(|uids| !uids.is_empty()) else {
            continue;
        };
        if preheat.category_option_combo_for_options(&uids).is_some() {
            continue;
        }
        if let Some(combo) = source.find_category_option_combo(&uids)? {
            preheat.put_category_option_combo_for_options(&uids, combo);
        }
    }
    Ok(())
}
