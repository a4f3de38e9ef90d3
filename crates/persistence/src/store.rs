// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use tracker_domain::{
    EventDataValue, ProgramInstance, ProgramOwner, ProgramStageInstance, RelationshipInstance,
    TrackedEntityAttributeValue, TrackedEntityComment, TrackedEntityInstance,
};

/// A tracker object written by the commit engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredObject {
    TrackedEntity(TrackedEntityInstance),
    Enrollment(ProgramInstance),
    Event(ProgramStageInstance),
    Relationship(RelationshipInstance),
    Comment(TrackedEntityComment),
    ProgramOwner(ProgramOwner),
}

impl StoredObject {
    /// Returns a short label of the object kind for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TrackedEntity(_) => "tracked_entity",
            Self::Enrollment(_) => "enrollment",
            Self::Event(_) => "event",
            Self::Relationship(_) => "relationship",
            Self::Comment(_) => "comment",
            Self::ProgramOwner(_) => "program_owner",
        }
    }
}

/// Storage that runs every commit in its own transaction.
pub trait TrackerStore {
    /// The unit of work of one transaction.
    type Session<'s>: TrackerSession
    where
        Self: 's;

    /// Begins a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn begin(&self) -> Result<Self::Session<'_>, PersistenceError>;

    /// Drops every cached lookup, so the next bundle reads committed data.
    fn clear_cache(&self);
}

/// The unit of work of one transaction.
///
/// Writes are staged until [`TrackerSession::flush`] checks them against
/// the referential constraints of the store. Nothing is visible to other
/// transactions before [`TrackerSession::commit`].
pub trait TrackerSession {
    /// Stages an insert or update of `object`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be staged.
    fn save(&mut self, object: StoredObject) -> Result<(), PersistenceError>;

    /// Stages an insert or update of an attribute value of a tracked entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be staged.
    fn save_attribute_value(
        &mut self,
        tracked_entity: &str,
        value: TrackedEntityAttributeValue,
    ) -> Result<(), PersistenceError>;

    /// Stages the removal of an attribute value of a tracked entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be staged.
    fn delete_attribute_value(
        &mut self,
        tracked_entity: &str,
        attribute: &str,
    ) -> Result<(), PersistenceError>;

    /// Stages an insert or update of a data value of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be staged.
    fn save_data_value(&mut self, event: &str, value: EventDataValue)
    -> Result<(), PersistenceError>;

    /// Stages the removal of a data value of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be staged.
    fn delete_data_value(&mut self, event: &str, data_element: &str)
    -> Result<(), PersistenceError>;

    /// Stages the assigned flag of a file resource.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if the file resource does not
    /// exist.
    fn set_file_resource_assigned(
        &mut self,
        file_resource: &str,
        assigned: bool,
    ) -> Result<(), PersistenceError>;

    /// Marks a reserved value of `text_pattern` as used.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be staged.
    fn use_reserved_value(
        &mut self,
        text_pattern: &str,
        value: &str,
    ) -> Result<(), PersistenceError>;

    /// Checks every staged write against the referential constraints.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::ForeignKeyViolation`] for the first write
    /// that references a missing tracker object.
    fn flush(&mut self) -> Result<(), PersistenceError>;

    /// Drops staged writes that were never flushed.
    fn clear(&mut self);

    /// Makes every flushed write visible.
    ///
    /// # Errors
    ///
    /// Returns an error if a staged write violates a constraint or the store
    /// cannot be written. Nothing is written in that case.
    fn commit(self) -> Result<(), PersistenceError>
    where
        Self: Sized;

    /// Discards every write of the transaction.
    fn rollback(self)
    where
        Self: Sized;
}
