// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversion of payload objects into their persisted form.
//!
//! Every reference is resolved through the preheat and stored as a uid.
//! Updates start from the stored object, so fields the payload does not
//! carry are kept. Attribute and data values are left to reconciliation.
//!
//! A reference missing from the preheat means validation let an invalid
//! object through, and is reported as [`CoreError::MissingMetadata`].

use crate::error::CoreError;
use crate::preheat::TrackerPreheat;
use time::OffsetDateTime;
use tracker_domain::{
    Enrollment, Event, IdentifiableObject, MetadataKind, Note, ProgramInstance,
    ProgramStageInstance, Relationship, RelationshipInstance, TrackedEntity,
    TrackedEntityComment, TrackedEntityInstance, UID_LENGTH,
};

fn require<'a, T: IdentifiableObject + ?Sized>(
    object: Option<&'a T>,
    kind: MetadataKind,
    identifier: &str,
) -> Result<&'a str, CoreError> {
    object
        .map(IdentifiableObject::uid)
        .ok_or_else(|| CoreError::MissingMetadata {
            kind,
            identifier: identifier.to_string(),
        })
}

/// Converts a payload tracked entity.
///
/// # Errors
///
/// Returns [`CoreError::MissingMetadata`] if the tracked entity type or the
/// org unit is not preheated.
pub fn to_tracked_entity_instance(
    preheat: &TrackerPreheat,
    tracked_entity: &TrackedEntity,
    now: OffsetDateTime,
) -> Result<TrackedEntityInstance, CoreError> {
    let mut instance: TrackedEntityInstance = preheat
        .tracked_entity(&tracked_entity.tracked_entity)
        .cloned()
        .unwrap_or_else(|| TrackedEntityInstance {
            created: Some(now),
            ..TrackedEntityInstance::new(&tracked_entity.tracked_entity)
        });

    instance.tracked_entity_type = require(
        preheat.tracked_entity_type(&tracked_entity.tracked_entity_type),
        MetadataKind::TrackedEntityType,
        &tracked_entity.tracked_entity_type,
    )?
    .to_string();
    instance.organisation_unit = require(
        preheat.organisation_unit(&tracked_entity.org_unit),
        MetadataKind::OrganisationUnit,
        &tracked_entity.org_unit,
    )?
    .to_string();
    Ok(instance)
}

/// Converts a payload enrollment.
///
/// # Errors
///
/// Returns [`CoreError::MissingMetadata`] if the program or the org unit is
/// not preheated.
pub fn to_program_instance(
    preheat: &TrackerPreheat,
    enrollment: &Enrollment,
    now: OffsetDateTime,
) -> Result<ProgramInstance, CoreError> {
    let mut instance: ProgramInstance = preheat
        .enrollment(&enrollment.enrollment)
        .cloned()
        .unwrap_or_else(|| ProgramInstance {
            created: Some(now),
            ..ProgramInstance::new(&enrollment.enrollment)
        });

    instance.program = require(
        preheat.program(&enrollment.program),
        MetadataKind::Program,
        &enrollment.program,
    )?
    .to_string();
    instance.organisation_unit = require(
        preheat.organisation_unit(&enrollment.org_unit),
        MetadataKind::OrganisationUnit,
        &enrollment.org_unit,
    )?
    .to_string();
    instance.tracked_entity = Some(enrollment.tracked_entity.clone());
    instance.status = enrollment.status;
    instance.enrollment_date = enrollment.enrolled_at.or(instance.enrollment_date);
    instance.incident_date = enrollment.occurred_at.or(instance.incident_date);
    Ok(instance)
}

/// Converts a payload event.
///
/// # Errors
///
/// Returns [`CoreError::MissingMetadata`] if the program stage, the org unit
/// or the attribute option combo cannot be resolved.
pub fn to_program_stage_instance(
    preheat: &TrackerPreheat,
    event: &Event,
    now: OffsetDateTime,
) -> Result<ProgramStageInstance, CoreError> {
    let mut instance: ProgramStageInstance = preheat
        .event(&event.event)
        .cloned()
        .unwrap_or_else(|| ProgramStageInstance {
            created: Some(now),
            ..ProgramStageInstance::new(&event.event)
        });

    instance.program_stage = require(
        preheat.program_stage(&event.program_stage),
        MetadataKind::ProgramStage,
        &event.program_stage,
    )?
    .to_string();
    instance.organisation_unit = require(
        preheat.organisation_unit(&event.org_unit),
        MetadataKind::OrganisationUnit,
        &event.org_unit,
    )?
    .to_string();

    let combo_identifier: &str = event
        .attribute_option_combo
        .as_deref()
        .or(event.attribute_category_options.as_deref())
        .unwrap_or("default");
    instance.attribute_option_combo = Some(
        require(
            preheat.attribute_option_combo(event),
            MetadataKind::CategoryOptionCombo,
            combo_identifier,
        )?
        .to_string(),
    );

    if let Some(enrollment) = event.enrollment.as_deref().filter(|uid| !uid.is_empty()) {
        instance.program_instance = Some(enrollment.to_string());
    }
    instance.status = event.status;
    instance.execution_date = event.occurred_at.or(instance.execution_date);
    instance.due_date = event.scheduled_at.or(instance.due_date);
    Ok(instance)
}

/// Converts a payload relationship.
///
/// # Errors
///
/// Returns [`CoreError::MissingMetadata`] if the relationship type is not
/// preheated.
pub fn to_relationship_instance(
    preheat: &TrackerPreheat,
    relationship: &Relationship,
    now: OffsetDateTime,
) -> Result<RelationshipInstance, CoreError> {
    let mut instance: RelationshipInstance = preheat
        .relationship(&relationship.relationship)
        .cloned()
        .unwrap_or_else(|| RelationshipInstance {
            created: Some(now),
            ..RelationshipInstance::new(&relationship.relationship)
        });

    instance.relationship_type = require(
        preheat.relationship_type(&relationship.relationship_type),
        MetadataKind::RelationshipType,
        &relationship.relationship_type,
    )?
    .to_string();
    instance.from = relationship.from.clone().unwrap_or_default();
    instance.to = relationship.to.clone().unwrap_or_default();
    instance.bidirectional = relationship.bidirectional;
    Ok(instance)
}

/// Converts the notes that are not stored yet into comments.
///
/// Notes without text are dropped and notes without a uid get a generated
/// one. The note author defaults to `username`.
#[must_use]
pub fn to_comments(
    preheat: &TrackerPreheat,
    notes: &[Note],
    username: Option<&str>,
    now: OffsetDateTime,
) -> Vec<TrackedEntityComment> {
    notes
        .iter()
        .filter(|note| !note.value.is_empty())
        .filter(|note| preheat.note(&note.note).is_none())
        .map(|note| TrackedEntityComment {
            uid: if note.note.is_empty() {
                generate_uid()
            } else {
                note.note.clone()
            },
            comment_text: note.value.clone(),
            creator: note
                .stored_by
                .clone()
                .or_else(|| username.map(str::to_string)),
            created: Some(now),
        })
        .collect()
}

/// Generates a random well-formed uid.
#[must_use]
pub fn generate_uid() -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const ALPHANUMERIC: &[u8] =
        b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let pick = |alphabet: &[u8]| -> char {
        char::from(alphabet[rand::random_range(0..alphabet.len())])
    };

    std::iter::once(pick(LETTERS))
        .chain((1..UID_LENGTH).map(|_| pick(ALPHANUMERIC)))
        .collect()
}
