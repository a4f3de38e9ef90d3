// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory transactional store.
//!
//! Committed data lives behind a `RwLock`. A transaction works on its own
//! copy of the data, stages writes, checks them on flush and applies them
//! to the committed data in one step on commit. Metadata lookups made
//! while preheating are cached until [`TrackerStore::clear_cache`].
//!
//! Attribute values and data values are stored as rows of their own, keyed
//! by their owner. Tracked entities and events are handed out with their
//! values embedded.

mod session;
mod source;

pub use session::MemorySession;

use crate::error::{PersistenceError, StoreLockError};
use crate::snapshot::StoreSnapshot;
use crate::store::{StoredObject, TrackerStore};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use tracker_domain::{
    EventDataValue, FileResource, MetadataKind, MetadataObject, ProgramInstance, ProgramOwner,
    ProgramStageInstance, RelationshipInstance, TrackedEntityAttributeValue, TrackedEntityComment,
    TrackedEntityInstance, TrackerIdSchemeParam, TrackerType, User,
};

type LookupKey = (MetadataKind, TrackerIdSchemeParam, String);

/// A staged write of a transaction.
#[derive(Debug, Clone)]
pub(crate) enum Change {
    Save(StoredObject),
    SaveAttributeValue {
        tracked_entity: String,
        value: TrackedEntityAttributeValue,
    },
    DeleteAttributeValue {
        tracked_entity: String,
        attribute: String,
    },
    SaveDataValue {
        event: String,
        value: EventDataValue,
    },
    DeleteDataValue {
        event: String,
        data_element: String,
    },
    FileResourceAssigned {
        file_resource: String,
        assigned: bool,
    },
    ReservedValueUsed {
        text_pattern: String,
        value: String,
    },
}

/// The tables of the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreData {
    /// Every metadata object except file resources.
    metadata: Vec<MetadataObject>,
    file_resources: BTreeMap<String, FileResource>,
    users: BTreeMap<String, User>,
    current_user: Option<String>,
    tracked_entities: BTreeMap<String, TrackedEntityInstance>,
    /// Tracked entity uid -> attribute uid -> value.
    attribute_values: BTreeMap<String, BTreeMap<String, TrackedEntityAttributeValue>>,
    enrollments: BTreeMap<String, ProgramInstance>,
    events: BTreeMap<String, ProgramStageInstance>,
    /// Event uid -> data element uid -> value.
    data_values: BTreeMap<String, BTreeMap<String, EventDataValue>>,
    relationships: BTreeMap<String, RelationshipInstance>,
    comments: BTreeMap<String, TrackedEntityComment>,
    /// `(tracked entity uid, program uid)` -> owner.
    program_owners: BTreeMap<(String, String), ProgramOwner>,
    reserved_values: BTreeMap<String, BTreeSet<String>>,
}

impl StoreData {
    fn tracked_entity(&self, uid: &str) -> Option<TrackedEntityInstance> {
        let mut tracked_entity: TrackedEntityInstance = self.tracked_entities.get(uid)?.clone();
        tracked_entity.attribute_values = self
            .attribute_values
            .get(uid)
            .map(|values| values.values().cloned().collect())
            .unwrap_or_default();
        Some(tracked_entity)
    }

    fn event(&self, uid: &str) -> Option<ProgramStageInstance> {
        let mut event: ProgramStageInstance = self.events.get(uid)?.clone();
        event.event_data_values = self
            .data_values
            .get(uid)
            .map(|values| values.values().cloned().collect())
            .unwrap_or_default();
        Some(event)
    }

    /// Checks the referential constraints of `change` against this data.
    fn check(&self, change: &Change) -> Result<(), PersistenceError> {
        let violation = |tracker_type: TrackerType, uid: &str, references: &str| {
            PersistenceError::ForeignKeyViolation {
                tracker_type,
                uid: uid.to_string(),
                references: references.to_string(),
            }
        };

        match change {
            Change::Save(StoredObject::Enrollment(enrollment)) => {
                if let Some(tracked_entity) = &enrollment.tracked_entity
                    && !self.tracked_entities.contains_key(tracked_entity)
                {
                    return Err(violation(
                        TrackerType::Enrollment,
                        &enrollment.uid,
                        tracked_entity,
                    ));
                }
            }
            Change::Save(StoredObject::Event(event)) => {
                if let Some(enrollment) = &event.program_instance
                    && !self.enrollments.contains_key(enrollment)
                {
                    return Err(violation(TrackerType::Event, &event.uid, enrollment));
                }
            }
            Change::Save(StoredObject::ProgramOwner(owner)) => {
                if !self.tracked_entities.contains_key(&owner.tracked_entity) {
                    return Err(violation(
                        TrackerType::TrackedEntity,
                        &owner.program,
                        &owner.tracked_entity,
                    ));
                }
            }
            Change::SaveAttributeValue {
                tracked_entity,
                value,
            } => {
                if !self.tracked_entities.contains_key(tracked_entity) {
                    return Err(violation(
                        TrackerType::TrackedEntity,
                        &value.attribute,
                        tracked_entity,
                    ));
                }
            }
            Change::SaveDataValue { event, value } => {
                if !self.events.contains_key(event) {
                    return Err(violation(TrackerType::Event, &value.data_element, event));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply(&mut self, change: Change) {
        match change {
            Change::Save(object) => self.save(object),
            Change::SaveAttributeValue {
                tracked_entity,
                value,
            } => {
                self.attribute_values
                    .entry(tracked_entity)
                    .or_default()
                    .insert(value.attribute.clone(), value);
            }
            Change::DeleteAttributeValue {
                tracked_entity,
                attribute,
            } => {
                if let Some(values) = self.attribute_values.get_mut(&tracked_entity) {
                    values.remove(&attribute);
                }
            }
            Change::SaveDataValue { event, value } => {
                self.data_values
                    .entry(event)
                    .or_default()
                    .insert(value.data_element.clone(), value);
            }
            Change::DeleteDataValue {
                event,
                data_element,
            } => {
                if let Some(values) = self.data_values.get_mut(&event) {
                    values.remove(&data_element);
                }
            }
            Change::FileResourceAssigned {
                file_resource,
                assigned,
            } => {
                if let Some(file_resource) = self.file_resources.get_mut(&file_resource) {
                    file_resource.assigned = assigned;
                }
            }
            Change::ReservedValueUsed {
                text_pattern,
                value,
            } => {
                if let Some(values) = self.reserved_values.get_mut(&text_pattern) {
                    values.remove(&value);
                }
            }
        }
    }

    fn save(&mut self, object: StoredObject) {
        match object {
            StoredObject::TrackedEntity(mut tracked_entity) => {
                tracked_entity.attribute_values.clear();
                self.tracked_entities
                    .insert(tracked_entity.uid.clone(), tracked_entity);
            }
            StoredObject::Enrollment(enrollment) => {
                self.enrollments.insert(enrollment.uid.clone(), enrollment);
            }
            StoredObject::Event(mut event) => {
                event.event_data_values.clear();
                self.events.insert(event.uid.clone(), event);
            }
            StoredObject::Relationship(relationship) => {
                self.relationships
                    .insert(relationship.uid.clone(), relationship);
            }
            StoredObject::Comment(comment) => {
                self.comments.insert(comment.uid.clone(), comment);
            }
            StoredObject::ProgramOwner(owner) => {
                self.program_owners.insert(
                    (owner.tracked_entity.clone(), owner.program.clone()),
                    owner,
                );
            }
        }
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        let mut snapshot: StoreSnapshot = StoreSnapshot::default();
        for object in self.metadata.iter().cloned() {
            match object {
                MetadataObject::OrganisationUnit(object) => {
                    snapshot.organisation_units.push(object);
                }
                MetadataObject::Program(object) => snapshot.programs.push(object),
                MetadataObject::ProgramStage(object) => snapshot.program_stages.push(object),
                MetadataObject::TrackedEntityType(object) => {
                    snapshot.tracked_entity_types.push(object);
                }
                MetadataObject::TrackedEntityAttribute(object) => {
                    snapshot.tracked_entity_attributes.push(object);
                }
                MetadataObject::DataElement(object) => snapshot.data_elements.push(object),
                MetadataObject::RelationshipType(object) => {
                    snapshot.relationship_types.push(object);
                }
                MetadataObject::CategoryOptionCombo(object) => {
                    snapshot.category_option_combos.push(object);
                }
                MetadataObject::CategoryOption(object) => snapshot.category_options.push(object),
                MetadataObject::FileResource(object) => snapshot.file_resources.push(object),
            }
        }
        snapshot
            .file_resources
            .extend(self.file_resources.values().cloned());
        snapshot.users = self.users.values().cloned().collect();
        snapshot.current_user.clone_from(&self.current_user);
        snapshot.tracked_entities = self
            .tracked_entities
            .keys()
            .filter_map(|uid| self.tracked_entity(uid))
            .collect();
        snapshot.enrollments = self.enrollments.values().cloned().collect();
        snapshot.events = self
            .events
            .keys()
            .filter_map(|uid| self.event(uid))
            .collect();
        snapshot.relationships = self.relationships.values().cloned().collect();
        snapshot.comments = self.comments.values().cloned().collect();
        snapshot.program_owners = self.program_owners.values().cloned().collect();
        snapshot.reserved_values = self
            .reserved_values
            .iter()
            .map(|(pattern, values)| (pattern.clone(), values.iter().cloned().collect()))
            .collect();
        snapshot
    }
}

impl From<StoreSnapshot> for StoreData {
    fn from(snapshot: StoreSnapshot) -> Self {
        let mut data: Self = Self::default();

        data.metadata
            .extend(snapshot.organisation_units.into_iter().map(MetadataObject::from));
        data.metadata
            .extend(snapshot.programs.into_iter().map(MetadataObject::from));
        data.metadata
            .extend(snapshot.program_stages.into_iter().map(MetadataObject::from));
        data.metadata
            .extend(snapshot.tracked_entity_types.into_iter().map(MetadataObject::from));
        data.metadata.extend(
            snapshot
                .tracked_entity_attributes
                .into_iter()
                .map(MetadataObject::from),
        );
        data.metadata
            .extend(snapshot.data_elements.into_iter().map(MetadataObject::from));
        data.metadata
            .extend(snapshot.relationship_types.into_iter().map(MetadataObject::from));
        data.metadata.extend(
            snapshot
                .category_option_combos
                .into_iter()
                .map(MetadataObject::from),
        );
        data.metadata
            .extend(snapshot.category_options.into_iter().map(MetadataObject::from));

        data.file_resources = snapshot
            .file_resources
            .into_iter()
            .map(|file_resource| (file_resource.uid.clone(), file_resource))
            .collect();
        data.users = snapshot
            .users
            .into_iter()
            .map(|user| (user.uid.clone(), user))
            .collect();
        data.current_user = snapshot.current_user;

        for mut tracked_entity in snapshot.tracked_entities {
            let values: Vec<TrackedEntityAttributeValue> =
                std::mem::take(&mut tracked_entity.attribute_values);
            data.attribute_values.insert(
                tracked_entity.uid.clone(),
                values
                    .into_iter()
                    .map(|value| (value.attribute.clone(), value))
                    .collect(),
            );
            data.tracked_entities
                .insert(tracked_entity.uid.clone(), tracked_entity);
        }
        data.enrollments = snapshot
            .enrollments
            .into_iter()
            .map(|enrollment| (enrollment.uid.clone(), enrollment))
            .collect();
        for mut event in snapshot.events {
            let values: Vec<EventDataValue> = std::mem::take(&mut event.event_data_values);
            data.data_values.insert(
                event.uid.clone(),
                values
                    .into_iter()
                    .map(|value| (value.data_element.clone(), value))
                    .collect(),
            );
            data.events.insert(event.uid.clone(), event);
        }
        data.relationships = snapshot
            .relationships
            .into_iter()
            .map(|relationship| (relationship.uid.clone(), relationship))
            .collect();
        data.comments = snapshot
            .comments
            .into_iter()
            .map(|comment| (comment.uid.clone(), comment))
            .collect();
        data.program_owners = snapshot
            .program_owners
            .into_iter()
            .map(|owner| ((owner.tracked_entity.clone(), owner.program.clone()), owner))
            .collect();
        data.reserved_values = snapshot
            .reserved_values
            .into_iter()
            .map(|(pattern, values)| (pattern, values.into_iter().collect()))
            .collect();
        data
    }
}

/// A tracker store held entirely in memory.
///
/// Clones share the same data, so one store can back several services.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
    lookups: Arc<RwLock<HashMap<LookupKey, Option<MetadataObject>>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding every object of `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            data: Arc::new(RwLock::new(StoreData::from(snapshot))),
            lookups: Arc::default(),
        }
    }

    /// Returns every committed object.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreSnapshot, PersistenceError> {
        Ok(self.read("taking a snapshot")?.to_snapshot())
    }

    /// Returns a committed tracked entity with its attribute values.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn tracked_entity(
        &self,
        uid: &str,
    ) -> Result<Option<TrackedEntityInstance>, PersistenceError> {
        Ok(self.read("reading a tracked entity")?.tracked_entity(uid))
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn enrollment(&self, uid: &str) -> Result<Option<ProgramInstance>, PersistenceError> {
        Ok(self
            .read("reading an enrollment")?
            .enrollments
            .get(uid)
            .cloned())
    }

    /// Returns a committed event with its data values.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn event(&self, uid: &str) -> Result<Option<ProgramStageInstance>, PersistenceError> {
        Ok(self.read("reading an event")?.event(uid))
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn relationship(
        &self,
        uid: &str,
    ) -> Result<Option<RelationshipInstance>, PersistenceError> {
        Ok(self
            .read("reading a relationship")?
            .relationships
            .get(uid)
            .cloned())
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn comment(&self, uid: &str) -> Result<Option<TrackedEntityComment>, PersistenceError> {
        Ok(self.read("reading a comment")?.comments.get(uid).cloned())
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn file_resource(&self, uid: &str) -> Result<Option<FileResource>, PersistenceError> {
        Ok(self
            .read("reading a file resource")?
            .file_resources
            .get(uid)
            .cloned())
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn program_owner(
        &self,
        tracked_entity: &str,
        program: &str,
    ) -> Result<Option<ProgramOwner>, PersistenceError> {
        Ok(self
            .read("reading a program owner")?
            .program_owners
            .get(&(tracked_entity.to_string(), program.to_string()))
            .cloned())
    }

    /// Returns the values of `text_pattern` that are reserved and unused.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Lock`] if the store lock is poisoned.
    pub fn reserved_values(&self, text_pattern: &str) -> Result<Vec<String>, PersistenceError> {
        Ok(self
            .read("reading reserved values")?
            .reserved_values
            .get(text_pattern)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default())
    }

    pub(crate) fn read(
        &self,
        operation: &'static str,
    ) -> Result<RwLockReadGuard<'_, StoreData>, StoreLockError> {
        self.data
            .read()
            .map_err(|_| StoreLockError::new(operation))
    }

    pub(crate) fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, StoreData>, StoreLockError> {
        self.data
            .write()
            .map_err(|_| StoreLockError::new(operation))
    }

    /// Returns the number of cached metadata lookups.
    #[cfg(test)]
    pub(crate) fn cached_lookups(&self) -> usize {
        self.lookups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl TrackerStore for InMemoryStore {
    type Session<'s> = MemorySession<'s>;

    fn begin(&self) -> Result<MemorySession<'_>, PersistenceError> {
        let working: StoreData = self.read("beginning a transaction")?.clone();
        debug!("Began transaction");
        Ok(MemorySession::new(self, working))
    }

    fn clear_cache(&self) {
        let mut lookups = self
            .lookups
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(entries = lookups.len(), "Cleared metadata lookup cache");
        lookups.clear();
    }
}
