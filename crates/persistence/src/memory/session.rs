// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{Change, InMemoryStore, StoreData};
use crate::error::PersistenceError;
use crate::store::{StoredObject, TrackerSession};
use tracing::{debug, info, trace};
use tracker_domain::{EventDataValue, TrackedEntityAttributeValue};

/// A transaction against an [`InMemoryStore`].
///
/// Reads of the session see the data committed when it began plus its own
/// flushed writes.
#[derive(Debug)]
pub struct MemorySession<'s> {
    store: &'s InMemoryStore,
    working: StoreData,
    pending: Vec<Change>,
    flushed: Vec<Change>,
}

impl<'s> MemorySession<'s> {
    pub(crate) const fn new(store: &'s InMemoryStore, working: StoreData) -> Self {
        Self {
            store,
            working,
            pending: Vec::new(),
            flushed: Vec::new(),
        }
    }

    /// Returns the number of staged writes not flushed yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of flushed writes awaiting commit.
    #[must_use]
    pub fn flushed(&self) -> usize {
        self.flushed.len()
    }
}

impl TrackerSession for MemorySession<'_> {
    fn save(&mut self, object: StoredObject) -> Result<(), PersistenceError> {
        trace!(kind = object.kind(), "Staging object");
        self.pending.push(Change::Save(object));
        Ok(())
    }

    fn save_attribute_value(
        &mut self,
        tracked_entity: &str,
        value: TrackedEntityAttributeValue,
    ) -> Result<(), PersistenceError> {
        self.pending.push(Change::SaveAttributeValue {
            tracked_entity: tracked_entity.to_string(),
            value,
        });
        Ok(())
    }

    fn delete_attribute_value(
        &mut self,
        tracked_entity: &str,
        attribute: &str,
    ) -> Result<(), PersistenceError> {
        self.pending.push(Change::DeleteAttributeValue {
            tracked_entity: tracked_entity.to_string(),
            attribute: attribute.to_string(),
        });
        Ok(())
    }

    fn save_data_value(
        &mut self,
        event: &str,
        value: EventDataValue,
    ) -> Result<(), PersistenceError> {
        self.pending.push(Change::SaveDataValue {
            event: event.to_string(),
            value,
        });
        Ok(())
    }

    fn delete_data_value(
        &mut self,
        event: &str,
        data_element: &str,
    ) -> Result<(), PersistenceError> {
        self.pending.push(Change::DeleteDataValue {
            event: event.to_string(),
            data_element: data_element.to_string(),
        });
        Ok(())
    }

    fn set_file_resource_assigned(
        &mut self,
        file_resource: &str,
        assigned: bool,
    ) -> Result<(), PersistenceError> {
        if !self.working.file_resources.contains_key(file_resource) {
            return Err(PersistenceError::NotFound(format!(
                "file resource '{file_resource}'"
            )));
        }
        self.pending.push(Change::FileResourceAssigned {
            file_resource: file_resource.to_string(),
            assigned,
        });
        Ok(())
    }

    fn use_reserved_value(
        &mut self,
        text_pattern: &str,
        value: &str,
    ) -> Result<(), PersistenceError> {
        self.pending.push(Change::ReservedValueUsed {
            text_pattern: text_pattern.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        let pending: Vec<Change> = std::mem::take(&mut self.pending);
        let count: usize = pending.len();
        for change in pending {
            self.working.check(&change)?;
            self.working.apply(change.clone());
            self.flushed.push(change);
        }
        if count > 0 {
            debug!(changes = count, "Flushed session");
        }
        Ok(())
    }

    fn clear(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                changes = self.pending.len(),
                "Dropping unflushed session changes"
            );
        }
        self.pending.clear();
    }

    fn commit(self) -> Result<(), PersistenceError> {
        let Self { store, flushed, .. } = self;
        let changes: usize = flushed.len();

        let mut data = store.write("committing a transaction")?;
        let mut next: StoreData = data.clone();
        for change in flushed {
            next.check(&change)?;
            next.apply(change);
        }
        *data = next;
        drop(data);

        info!(changes, "Committed transaction");
        Ok(())
    }

    fn rollback(self) {
        info!(
            changes = self.pending.len() + self.flushed.len(),
            "Rolled back transaction"
        );
    }
}
