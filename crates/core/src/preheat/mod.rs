// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The preheat: every object a bundle references, resolved up front.
//!
//! Validation and commit only ever read from the preheat. Nothing is
//! resolved lazily, so a lookup miss means the object does not exist.

mod builder;
mod collector;

pub use builder::{PreheatSource, preheat};
pub use collector::{TrackerIdentifierCollector, scheme_for};

use std::collections::{BTreeSet, HashMap, HashSet};
use tracker_domain::{
    CategoryOption, CategoryOptionCombo, DataElement, Event, FileResource, Metadata,
    MetadataKind, MetadataObject, OrganisationUnit, Program, ProgramInstance, ProgramOwner,
    ProgramStage, ProgramStageInstance, RelationshipInstance, RelationshipType,
    TrackedEntityAttribute, TrackedEntityComment, TrackedEntityInstance, TrackedEntityType,
    TrackerIdScheme, TrackerIdSchemeParam, TrackerIdentifierParams, User,
};

/// A tracker object present in the payload, with the uid of its parent.
///
/// Lets validation accept references to objects created by the same
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTrackerEntity {
    pub uid: String,
    /// The enclosing tracked entity or enrollment, if any.
    pub parent_uid: Option<String>,
}

type MetadataIndex = HashMap<MetadataKind, HashMap<String, MetadataObject>>;
type EntityIndex<T> = HashMap<TrackerIdScheme, HashMap<String, T>>;

/// Resolved reference cache of one bundle.
#[derive(Debug, Clone, Default)]
pub struct TrackerPreheat {
    identifiers: TrackerIdentifierParams,
    metadata: HashMap<TrackerIdSchemeParam, MetadataIndex>,
    tracked_entities: EntityIndex<TrackedEntityInstance>,
    enrollments: EntityIndex<ProgramInstance>,
    events: EntityIndex<ProgramStageInstance>,
    relationships: EntityIndex<RelationshipInstance>,
    /// Tracked entity uid -> program uid -> owner.
    program_owners: HashMap<String, HashMap<String, ProgramOwner>>,
    enrollments_with_events: HashSet<String>,
    /// `(program stage uid, enrollment uid)` pairs with at least one event.
    program_stages_with_events: HashSet<(String, String)>,
    users: HashMap<String, User>,
    notes: HashMap<String, TrackedEntityComment>,
    references: HashMap<String, ReferenceTrackerEntity>,
    /// Sorted category option uids -> combo uid.
    combos_by_options: HashMap<String, String>,
    default_category_option_combo: Option<String>,
}

impl TrackerPreheat {
    /// Creates an empty preheat for the given identifier schemes.
    #[must_use]
    pub fn new(identifiers: TrackerIdentifierParams) -> Self {
        Self {
            identifiers,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn identifiers(&self) -> &TrackerIdentifierParams {
        &self.identifiers
    }

    /// The scheme tracker objects are indexed under.
    fn entity_scheme(&self) -> TrackerIdScheme {
        self.identifiers.id_scheme.id_scheme()
    }

    /// Stores a metadata object under its identifier for `scheme`.
    ///
    /// Objects are additionally indexed by uid, so uid lookups succeed for
    /// every preheated object. An object without an identifier under
    /// `scheme` is indexed by uid only.
    pub fn put_object(&mut self, scheme: &TrackerIdSchemeParam, object: MetadataObject) {
        let kind: MetadataKind = object.kind();
        let identifier: Option<String> = scheme
            .identify(object.as_identifiable())
            .filter(|_| *scheme != TrackerIdSchemeParam::UID);

        if let Some(identifier) = identifier {
            self.metadata
                .entry(scheme.clone())
                .or_default()
                .entry(kind)
                .or_default()
                .insert(identifier, object.clone());
        }

        let uid: String = object.as_identifiable().uid().to_string();
        self.metadata
            .entry(TrackerIdSchemeParam::UID)
            .or_default()
            .entry(kind)
            .or_default()
            .insert(uid, object);
    }

    /// Stores a typed metadata object. See [`Self::put_object`].
    pub fn put<T: Metadata>(&mut self, scheme: &TrackerIdSchemeParam, object: T) {
        self.put_object(scheme, object.into());
    }

    /// Returns the metadata object of type `T` identified by `identifier`
    /// under `scheme`.
    #[must_use]
    pub fn get<T: Metadata>(&self, scheme: &TrackerIdSchemeParam, identifier: &str) -> Option<&T> {
        self.metadata
            .get(scheme)?
            .get(&T::KIND)?
            .get(identifier)
            .and_then(T::from_object)
    }

    /// Mutably borrows the copy of a metadata object indexed under `scheme`.
    pub fn get_mut<T: Metadata>(
        &mut self,
        scheme: &TrackerIdSchemeParam,
        identifier: &str,
    ) -> Option<&mut T> {
        self.metadata
            .get_mut(scheme)?
            .get_mut(&T::KIND)?
            .get_mut(identifier)
            .and_then(T::from_object_mut)
    }

    /// Returns all preheated objects of type `T`, each once.
    pub fn all<'a, T: Metadata + 'a>(&'a self) -> impl Iterator<Item = &'a T> {
        self.metadata
            .get(&TrackerIdSchemeParam::UID)
            .and_then(|index| index.get(&T::KIND))
            .into_iter()
            .flat_map(HashMap::values)
            .filter_map(T::from_object)
    }

    #[must_use]
    pub fn organisation_unit(&self, identifier: &str) -> Option<&OrganisationUnit> {
        self.get(self.identifiers.org_unit(), identifier)
    }

    #[must_use]
    pub fn program(&self, identifier: &str) -> Option<&Program> {
        self.get(self.identifiers.program(), identifier)
    }

    #[must_use]
    pub fn program_stage(&self, identifier: &str) -> Option<&ProgramStage> {
        self.get(self.identifiers.program_stage(), identifier)
    }

    #[must_use]
    pub fn data_element(&self, identifier: &str) -> Option<&DataElement> {
        self.get(self.identifiers.data_element(), identifier)
    }

    #[must_use]
    pub fn category_option_combo(&self, identifier: &str) -> Option<&CategoryOptionCombo> {
        self.get(self.identifiers.category_option_combo(), identifier)
    }

    #[must_use]
    pub fn category_option(&self, identifier: &str) -> Option<&CategoryOption> {
        self.get(self.identifiers.category_option(), identifier)
    }

    /// Tracked entity types are always referenced by uid.
    #[must_use]
    pub fn tracked_entity_type(&self, uid: &str) -> Option<&TrackedEntityType> {
        self.get(&TrackerIdSchemeParam::UID, uid)
    }

    /// Tracked entity attributes are always referenced by uid.
    #[must_use]
    pub fn tracked_entity_attribute(&self, uid: &str) -> Option<&TrackedEntityAttribute> {
        self.get(&TrackerIdSchemeParam::UID, uid)
    }

    /// Relationship types are always referenced by uid.
    #[must_use]
    pub fn relationship_type(&self, uid: &str) -> Option<&RelationshipType> {
        self.get(&TrackerIdSchemeParam::UID, uid)
    }

    /// File resources are always referenced by uid.
    #[must_use]
    pub fn file_resource(&self, uid: &str) -> Option<&FileResource> {
        self.get(&TrackerIdSchemeParam::UID, uid)
    }

    pub fn file_resource_mut(&mut self, uid: &str) -> Option<&mut FileResource> {
        self.get_mut(&TrackerIdSchemeParam::UID, uid)
    }

    #[must_use]
    pub fn tracked_entity(&self, uid: &str) -> Option<&TrackedEntityInstance> {
        self.tracked_entities.get(&self.entity_scheme())?.get(uid)
    }

    /// Registers a stored or newly persisted tracked entity.
    pub fn put_tracked_entity(&mut self, tracked_entity: TrackedEntityInstance) {
        let scheme: TrackerIdScheme = self.entity_scheme();
        self.tracked_entities
            .entry(scheme)
            .or_default()
            .insert(tracked_entity.uid.clone(), tracked_entity);
    }

    #[must_use]
    pub fn enrollment(&self, uid: &str) -> Option<&ProgramInstance> {
        self.enrollments.get(&self.entity_scheme())?.get(uid)
    }

    /// Registers a stored or newly persisted enrollment.
    pub fn put_enrollment(&mut self, enrollment: ProgramInstance) {
        let scheme: TrackerIdScheme = self.entity_scheme();
        self.enrollments
            .entry(scheme)
            .or_default()
            .insert(enrollment.uid.clone(), enrollment);
    }

    #[must_use]
    pub fn event(&self, uid: &str) -> Option<&ProgramStageInstance> {
        self.events.get(&self.entity_scheme())?.get(uid)
    }

    /// Registers a stored or newly persisted event.
    pub fn put_event(&mut self, event: ProgramStageInstance) {
        let scheme: TrackerIdScheme = self.entity_scheme();
        self.events
            .entry(scheme)
            .or_default()
            .insert(event.uid.clone(), event);
    }

    #[must_use]
    pub fn relationship(&self, uid: &str) -> Option<&RelationshipInstance> {
        self.relationships.get(&self.entity_scheme())?.get(uid)
    }

    /// Registers a stored or newly persisted relationship.
    pub fn put_relationship(&mut self, relationship: RelationshipInstance) {
        let scheme: TrackerIdScheme = self.entity_scheme();
        self.relationships
            .entry(scheme)
            .or_default()
            .insert(relationship.uid.clone(), relationship);
    }

    /// Returns the owner of `tracked_entity` within `program`.
    #[must_use]
    pub fn program_owner(&self, tracked_entity: &str, program: &str) -> Option<&ProgramOwner> {
        self.program_owners.get(tracked_entity)?.get(program)
    }

    pub fn put_program_owner(&mut self, owner: ProgramOwner) {
        self.program_owners
            .entry(owner.tracked_entity.clone())
            .or_default()
            .insert(owner.program.clone(), owner);
    }

    /// Returns whether the enrollment has at least one non-deleted event.
    #[must_use]
    pub fn program_instance_has_events(&self, enrollment: &str) -> bool {
        self.enrollments_with_events.contains(enrollment)
    }

    pub fn add_enrollment_with_events(&mut self, enrollment: impl Into<String>) {
        self.enrollments_with_events.insert(enrollment.into());
    }

    /// Returns whether `program_stage` has events within `enrollment`.
    #[must_use]
    pub fn program_stage_has_events(&self, program_stage: &str, enrollment: &str) -> bool {
        self.program_stages_with_events
            .contains(&(program_stage.to_string(), enrollment.to_string()))
    }

    pub fn add_program_stage_with_events(
        &mut self,
        program_stage: impl Into<String>,
        enrollment: impl Into<String>,
    ) {
        self.program_stages_with_events
            .insert((program_stage.into(), enrollment.into()));
    }

    #[must_use]
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn put_user(&mut self, user: User) {
        self.users.insert(user.username.clone(), user);
    }

    /// Returns a stored note by uid.
    #[must_use]
    pub fn note(&self, uid: &str) -> Option<&TrackedEntityComment> {
        self.notes.get(uid)
    }

    pub fn put_note(&mut self, note: TrackedEntityComment) {
        self.notes.insert(note.uid.clone(), note);
    }

    /// Returns the payload object with `uid`, if the payload contains one.
    #[must_use]
    pub fn reference(&self, uid: &str) -> Option<&ReferenceTrackerEntity> {
        self.references.get(uid)
    }

    pub fn put_reference(&mut self, uid: impl Into<String>, parent_uid: Option<String>) {
        let uid: String = uid.into();
        self.references.insert(
            uid.clone(),
            ReferenceTrackerEntity { uid, parent_uid },
        );
    }

    /// Registers the combo made of exactly `category_options` (uids).
    pub fn put_category_option_combo_for_options(
        &mut self,
        category_options: &BTreeSet<String>,
        combo: CategoryOptionCombo,
    ) {
        self.combos_by_options
            .insert(options_key(category_options), combo.uid.clone());
        self.put(&TrackerIdSchemeParam::UID, combo);
    }

    /// Returns the combo made of exactly `category_options` (uids).
    #[must_use]
    pub fn category_option_combo_for_options(
        &self,
        category_options: &BTreeSet<String>,
    ) -> Option<&CategoryOptionCombo> {
        let uid: &String = self.combos_by_options.get(&options_key(category_options))?;
        self.get(&TrackerIdSchemeParam::UID, uid)
    }

    /// Registers the system default category option combo.
    pub fn set_default_category_option_combo(&mut self, combo: CategoryOptionCombo) {
        self.default_category_option_combo = Some(combo.uid.clone());
        self.put(&TrackerIdSchemeParam::UID, combo);
    }

    #[must_use]
    pub fn default_category_option_combo(&self) -> Option<&CategoryOptionCombo> {
        let uid: &String = self.default_category_option_combo.as_ref()?;
        self.get(&TrackerIdSchemeParam::UID, uid)
    }

    /// Resolves the attribute option combo of an event.
    ///
    /// An explicit combo identifier wins. Otherwise the combo is looked up by
    /// the event's attribute category options. Events without either get the
    /// default combo.
    #[must_use]
    pub fn attribute_option_combo(&self, event: &Event) -> Option<&CategoryOptionCombo> {
        if let Some(identifier) = event
            .attribute_option_combo
            .as_deref()
            .filter(|id| !id.is_empty())
        {
            return self.category_option_combo(identifier);
        }

        if let Some(options) = event
            .attribute_category_options
            .as_deref()
            .filter(|options| !options.is_empty())
        {
            let uids: Option<BTreeSet<String>> = split_category_options(options)
                .map(|identifier| {
                    self.category_option(identifier)
                        .map(|option| option.uid.clone())
                })
                .collect();
            return self.category_option_combo_for_options(&uids?);
        }

        self.default_category_option_combo()
    }
}

/// Splits a `;` separated list of category option identifiers.
pub fn split_category_options(options: &str) -> impl Iterator<Item = &str> {
    options
        .split(';')
        .map(str::trim)
        .filter(|identifier| !identifier.is_empty())
}

fn options_key(category_options: &BTreeSet<String>) -> String {
    category_options
        .iter()
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(";")
}
