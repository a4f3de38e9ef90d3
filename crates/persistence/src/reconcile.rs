// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of stored attribute and data values with a payload.
//!
//! Every payload value is matched against the stored value of the same
//! attribute or data element. An empty payload value removes the stored
//! one; anything else is written in place or inserted. File values toggle
//! the assigned flag of their file resource.

use crate::error::PersistenceError;
use crate::store::TrackerSession;
use time::OffsetDateTime;
use tracing::{trace, warn};
use tracker::{CoreError, TrackerPreheat};
use tracker_domain::{
    Attribute, DataElement, DataValue, EventDataValue, MetadataKind, ProgramStageInstance,
    TrackedEntityAttribute, TrackedEntityAttributeValue, TrackedEntityInstance,
};

/// Reconciles `attributes` with the stored values of `tracked_entity`.
///
/// The values of `tracked_entity` are updated to match what is staged in
/// `session`.
///
/// # Errors
///
/// Returns [`PersistenceError::ContractViolation`] if an attribute is not
/// preheated, or the first error raised by `session`.
pub fn reconcile_attributes<S: TrackerSession>(
    session: &mut S,
    preheat: &mut TrackerPreheat,
    tracked_entity: &mut TrackedEntityInstance,
    attributes: &[Attribute],
    username: Option<&str>,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    for attribute in attributes {
        let metadata: TrackedEntityAttribute = preheat
            .tracked_entity_attribute(&attribute.attribute)
            .cloned()
            .ok_or_else(|| CoreError::MissingMetadata {
                kind: MetadataKind::TrackedEntityAttribute,
                identifier: attribute.attribute.clone(),
            })?;
        let is_file: bool = metadata.value_type.is_file_type();

        let Some(value) = attribute.non_empty_value() else {
            let Some(index) = tracked_entity
                .attribute_values
                .iter()
                .position(|stored| stored.attribute == metadata.uid)
            else {
                continue;
            };
            let removed: TrackedEntityAttributeValue =
                tracked_entity.attribute_values.remove(index);
            if is_file {
                unassign_file_resource(session, preheat, &removed.value)?;
            }
            session.delete_attribute_value(&tracked_entity.uid, &metadata.uid)?;
            trace!(
                tracked_entity = %tracked_entity.uid,
                attribute = %metadata.uid,
                "Removed attribute value"
            );
            continue;
        };

        if is_file {
            assign_file_resource(session, preheat, value)?;
        }

        let stored_by: Option<String> = attribute
            .stored_by
            .clone()
            .or_else(|| username.map(str::to_string));
        let row: TrackedEntityAttributeValue = if let Some(stored) = tracked_entity
            .attribute_values
            .iter_mut()
            .find(|stored| stored.attribute == metadata.uid)
        {
            stored.value = value.to_string();
            stored.stored_by = stored_by;
            stored.last_updated = Some(now);
            stored.clone()
        } else {
            let row: TrackedEntityAttributeValue = TrackedEntityAttributeValue {
                attribute: metadata.uid.clone(),
                value: value.to_string(),
                stored_by,
                created: Some(now),
                last_updated: Some(now),
            };
            tracked_entity.attribute_values.push(row.clone());
            row
        };
        session.save_attribute_value(&tracked_entity.uid, row)?;

        if metadata.generated
            && let Some(text_pattern) = &metadata.text_pattern
        {
            session.use_reserved_value(text_pattern, value)?;
        }
    }
    Ok(())
}

/// Reconciles `data_values` with the stored values of `event`.
///
/// Payload timestamps are kept; missing ones default to `now`.
///
/// # Errors
///
/// Returns [`PersistenceError::ContractViolation`] if a data element is not
/// preheated, or the first error raised by `session`.
pub fn reconcile_data_values<S: TrackerSession>(
    session: &mut S,
    preheat: &mut TrackerPreheat,
    event: &mut ProgramStageInstance,
    data_values: &[DataValue],
    username: Option<&str>,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    for data_value in data_values {
        let metadata: DataElement = preheat
            .data_element(&data_value.data_element)
            .cloned()
            .ok_or_else(|| CoreError::MissingMetadata {
                kind: MetadataKind::DataElement,
                identifier: data_value.data_element.clone(),
            })?;
        let is_file: bool = metadata.value_type.is_file_type();

        let Some(value) = data_value.non_empty_value() else {
            let Some(index) = event
                .event_data_values
                .iter()
                .position(|stored| stored.data_element == metadata.uid)
            else {
                continue;
            };
            let removed: EventDataValue = event.event_data_values.remove(index);
            if is_file {
                unassign_file_resource(session, preheat, &removed.value)?;
            }
            session.delete_data_value(&event.uid, &metadata.uid)?;
            continue;
        };

        if is_file {
            assign_file_resource(session, preheat, value)?;
        }

        let stored_by: Option<String> = data_value
            .stored_by
            .clone()
            .or_else(|| username.map(str::to_string));
        let last_updated: OffsetDateTime = data_value.updated_at.unwrap_or(now);
        let row: EventDataValue = if let Some(stored) = event
            .event_data_values
            .iter_mut()
            .find(|stored| stored.data_element == metadata.uid)
        {
            stored.value = value.to_string();
            stored.stored_by = stored_by;
            stored.last_updated = Some(last_updated);
            stored.clone()
        } else {
            let row: EventDataValue = EventDataValue {
                data_element: metadata.uid.clone(),
                value: value.to_string(),
                stored_by,
                created: Some(data_value.created_at.unwrap_or(now)),
                last_updated: Some(last_updated),
            };
            event.event_data_values.push(row.clone());
            row
        };
        session.save_data_value(&event.uid, row)?;
    }
    Ok(())
}

fn assign_file_resource<S: TrackerSession>(
    session: &mut S,
    preheat: &mut TrackerPreheat,
    uid: &str,
) -> Result<(), PersistenceError> {
    session.set_file_resource_assigned(uid, true)?;
    if let Some(file_resource) = preheat.file_resource_mut(uid) {
        file_resource.assigned = true;
    }
    Ok(())
}

/// Clears the assigned flag of a previously linked file resource.
///
/// A file resource that no longer exists has nothing to unassign.
fn unassign_file_resource<S: TrackerSession>(
    session: &mut S,
    preheat: &mut TrackerPreheat,
    uid: &str,
) -> Result<(), PersistenceError> {
    match session.set_file_resource_assigned(uid, false) {
        Ok(()) => {}
        Err(PersistenceError::NotFound(_)) => {
            warn!(file_resource = uid, "Previously linked file resource not found");
            return Ok(());
        }
        Err(err) => return Err(err),
    }
    if let Some(file_resource) = preheat.file_resource_mut(uid) {
        file_resource.assigned = false;
    }
    Ok(())
}
