// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bundle::TrackerBundle;
use crate::preheat::split_category_options;
use std::collections::{BTreeMap, BTreeSet};
use tracker_domain::{
    Attribute, MetadataKind, Note, RelationshipItem, TrackerIdSchemeParam,
    TrackerIdentifierParams, TrackerType,
};

/// Returns the scheme payload references of `kind` are expressed in.
///
/// Tracked entity types, attributes, relationship types and file resources
/// are always referenced by uid.
#[must_use]
pub fn scheme_for(
    kind: MetadataKind,
    identifiers: &TrackerIdentifierParams,
) -> TrackerIdSchemeParam {
    match kind {
        MetadataKind::OrganisationUnit => identifiers.org_unit().clone(),
        MetadataKind::Program => identifiers.program().clone(),
        MetadataKind::ProgramStage => identifiers.program_stage().clone(),
        MetadataKind::DataElement => identifiers.data_element().clone(),
        MetadataKind::CategoryOptionCombo => identifiers.category_option_combo().clone(),
        MetadataKind::CategoryOption => identifiers.category_option().clone(),
        MetadataKind::TrackedEntityType
        | MetadataKind::TrackedEntityAttribute
        | MetadataKind::RelationshipType
        | MetadataKind::FileResource => TrackerIdSchemeParam::UID,
    }
}

/// Every identifier a payload references, collected in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerIdentifierCollector {
    metadata: BTreeMap<MetadataKind, BTreeSet<String>>,
    tracker_uids: BTreeMap<TrackerType, BTreeSet<String>>,
    usernames: BTreeSet<String>,
    notes: BTreeSet<String>,
}

impl TrackerIdentifierCollector {
    /// Collects the identifiers referenced by the payload lists of `bundle`.
    ///
    /// File resources are not collected here: which values are file
    /// references is only known once attributes and data elements are
    /// resolved.
    #[must_use]
    pub fn collect(bundle: &TrackerBundle) -> Self {
        let mut collector: Self = Self::default();

        for tracked_entity in &bundle.tracked_entities {
            collector.add_tracker_uid(TrackerType::TrackedEntity, &tracked_entity.tracked_entity);
            collector.add_metadata(MetadataKind::OrganisationUnit, &tracked_entity.org_unit);
            collector.add_metadata(
                MetadataKind::TrackedEntityType,
                &tracked_entity.tracked_entity_type,
            );
            collector.add_attributes(&tracked_entity.attributes);
        }

        for enrollment in &bundle.enrollments {
            collector.add_tracker_uid(TrackerType::Enrollment, &enrollment.enrollment);
            collector.add_tracker_uid(TrackerType::TrackedEntity, &enrollment.tracked_entity);
            collector.add_metadata(MetadataKind::OrganisationUnit, &enrollment.org_unit);
            collector.add_metadata(MetadataKind::Program, &enrollment.program);
            collector.add_attributes(&enrollment.attributes);
            collector.add_notes(&enrollment.notes);
        }

        for event in &bundle.events {
            collector.add_tracker_uid(TrackerType::Event, &event.event);
            if let Some(enrollment) = &event.enrollment {
                collector.add_tracker_uid(TrackerType::Enrollment, enrollment);
            }
            collector.add_metadata(MetadataKind::OrganisationUnit, &event.org_unit);
            collector.add_metadata(MetadataKind::Program, &event.program);
            collector.add_metadata(MetadataKind::ProgramStage, &event.program_stage);
            if let Some(combo) = &event.attribute_option_combo {
                collector.add_metadata(MetadataKind::CategoryOptionCombo, combo);
            }
            if let Some(options) = &event.attribute_category_options {
                for option in split_category_options(options) {
                    collector.add_metadata(MetadataKind::CategoryOption, option);
                }
            }
            for data_value in &event.data_values {
                collector.add_metadata(MetadataKind::DataElement, &data_value.data_element);
                collector.add_username(data_value.stored_by.as_deref());
            }
            collector.add_notes(&event.notes);
        }

        for relationship in &bundle.relationships {
            collector.add_tracker_uid(TrackerType::Relationship, &relationship.relationship);
            collector.add_metadata(
                MetadataKind::RelationshipType,
                &relationship.relationship_type,
            );
            for item in [&relationship.from, &relationship.to].into_iter().flatten() {
                collector.add_relationship_item(item);
            }
        }

        collector
    }

    /// Returns the identifiers referenced for `kind`.
    #[must_use]
    pub fn metadata(&self, kind: MetadataKind) -> Option<&BTreeSet<String>> {
        self.metadata.get(&kind)
    }

    /// Returns every metadata kind with at least one reference.
    pub fn metadata_kinds(&self) -> impl Iterator<Item = MetadataKind> + '_ {
        self.metadata.keys().copied()
    }

    /// Returns the uids of tracker objects of `tracker_type` referenced by
    /// the payload, either as payload objects or as references.
    #[must_use]
    pub fn tracker_uids(&self, tracker_type: TrackerType) -> BTreeSet<String> {
        self.tracker_uids
            .get(&tracker_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the usernames referenced by `stored_by` fields.
    #[must_use]
    pub const fn usernames(&self) -> &BTreeSet<String> {
        &self.usernames
    }

    /// Returns the uids of all notes in the payload.
    #[must_use]
    pub const fn notes(&self) -> &BTreeSet<String> {
        &self.notes
    }

    fn add_metadata(&mut self, kind: MetadataKind, identifier: &str) {
        if !identifier.is_empty() {
            self.metadata
                .entry(kind)
                .or_default()
                .insert(identifier.to_string());
        }
    }

    fn add_tracker_uid(&mut self, tracker_type: TrackerType, uid: &str) {
        if !uid.is_empty() {
            self.tracker_uids
                .entry(tracker_type)
                .or_default()
                .insert(uid.to_string());
        }
    }

    fn add_username(&mut self, username: Option<&str>) {
        if let Some(username) = username.filter(|name| !name.is_empty()) {
            self.usernames.insert(username.to_string());
        }
    }

    fn add_attributes(&mut self, attributes: &[Attribute]) {
        for attribute in attributes {
            self.add_metadata(MetadataKind::TrackedEntityAttribute, &attribute.attribute);
            self.add_username(attribute.stored_by.as_deref());
        }
    }

    fn add_notes(&mut self, notes: &[Note]) {
        for note in notes {
            if !note.note.is_empty() {
                self.notes.insert(note.note.clone());
            }
            self.add_username(note.stored_by.as_deref());
        }
    }

    fn add_relationship_item(&mut self, item: &RelationshipItem) {
        if let Some((tracker_type, uid)) = item.reference() {
            self.add_tracker_uid(tracker_type, uid);
        }
    }
}
