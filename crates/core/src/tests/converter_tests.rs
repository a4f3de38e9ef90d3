// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    COMBO, DEFAULT_COMBO, ENROLLMENT, EVENT, ORG_UNIT, PROGRAM, PROGRAM_STAGE, RELATIONSHIP,
    RELATIONSHIP_TYPE, TRACKED_ENTITY, TRACKED_ENTITY_TYPE, create_test_enrollment,
    create_test_event, create_test_preheat, create_test_relationship, create_test_tracked_entity,
};
use crate::converter::{
    generate_uid, to_comments, to_program_instance, to_program_stage_instance,
    to_relationship_instance, to_tracked_entity_instance,
};
use crate::{CoreError, TrackerPreheat};
use time::OffsetDateTime;
use time::macros::datetime;
use tracker_domain::{
    EnrollmentStatus, Event, MetadataKind, Note, ProgramInstance, ProgramStageInstance,
    TrackedEntityComment, TrackedEntityInstance, is_valid_uid,
};

const NOW: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

#[test]
fn test_new_tracked_entity_is_stamped_created() {
    let preheat: TrackerPreheat = create_test_preheat();

    let instance: TrackedEntityInstance =
        to_tracked_entity_instance(&preheat, &create_test_tracked_entity(TRACKED_ENTITY), NOW)
            .unwrap();

    assert_eq!(instance.uid, TRACKED_ENTITY);
    assert_eq!(instance.tracked_entity_type, TRACKED_ENTITY_TYPE);
    assert_eq!(instance.organisation_unit, ORG_UNIT);
    assert_eq!(instance.created, Some(NOW));
    assert!(!instance.deleted);
}

#[test]
fn test_update_starts_from_stored_object() {
    let mut preheat: TrackerPreheat = create_test_preheat();
    let created: OffsetDateTime = datetime!(2025-01-01 0:00 UTC);
    preheat.put_enrollment(ProgramInstance {
        created: Some(created),
        enrollment_date: Some(created),
        comments: vec![String::from("Note0000001")],
        ..ProgramInstance::new(ENROLLMENT)
    });
    let mut enrollment = create_test_enrollment(ENROLLMENT, TRACKED_ENTITY);
    enrollment.status = EnrollmentStatus::Completed;

    let instance: ProgramInstance = to_program_instance(&preheat, &enrollment, NOW).unwrap();

    assert_eq!(instance.created, Some(created));
    assert_eq!(instance.enrollment_date, Some(created));
    assert_eq!(instance.program, PROGRAM);
    assert_eq!(instance.tracked_entity.as_deref(), Some(TRACKED_ENTITY));
    assert_eq!(instance.status, EnrollmentStatus::Completed);
    assert_eq!(instance.comments, vec![String::from("Note0000001")]);
}

#[test]
fn test_event_gets_resolved_attribute_option_combo() {
    let preheat: TrackerPreheat = create_test_preheat();
    let with_combo: Event = Event {
        attribute_option_combo: Some(COMBO.to_string()),
        ..create_test_event(EVENT, ENROLLMENT)
    };

    let explicit: ProgramStageInstance =
        to_program_stage_instance(&preheat, &with_combo, NOW).unwrap();
    let default: ProgramStageInstance =
        to_program_stage_instance(&preheat, &create_test_event(EVENT, ENROLLMENT), NOW).unwrap();

    assert_eq!(explicit.attribute_option_combo.as_deref(), Some(COMBO));
    assert_eq!(default.attribute_option_combo.as_deref(), Some(DEFAULT_COMBO));
    assert_eq!(default.program_stage, PROGRAM_STAGE);
    assert_eq!(default.program_instance.as_deref(), Some(ENROLLMENT));
}

#[test]
fn test_missing_metadata_is_a_contract_violation() {
    let preheat: TrackerPreheat = create_test_preheat();
    let mut relationship = create_test_relationship(RELATIONSHIP, TRACKED_ENTITY, TRACKED_ENTITY);
    relationship.relationship_type = String::from("Missing0001");

    let result: Result<_, CoreError> = to_relationship_instance(&preheat, &relationship, NOW);

    assert_eq!(
        result.unwrap_err(),
        CoreError::MissingMetadata {
            kind: MetadataKind::RelationshipType,
            identifier: String::from("Missing0001"),
        }
    );
}

#[test]
fn test_relationship_conversion() {
    let preheat: TrackerPreheat = create_test_preheat();
    let relationship = create_test_relationship(RELATIONSHIP, TRACKED_ENTITY, "TrackEnt002");

    let instance = to_relationship_instance(&preheat, &relationship, NOW).unwrap();

    assert_eq!(instance.relationship_type, RELATIONSHIP_TYPE);
    assert_eq!(instance.to.tracked_entity.as_deref(), Some("TrackEnt002"));
}

#[test]
fn test_comments_skip_stored_and_empty_notes() {
    let mut preheat: TrackerPreheat = create_test_preheat();
    preheat.put_note(TrackedEntityComment {
        uid: String::from("Note0000001"),
        ..TrackedEntityComment::default()
    });
    let note = |uid: &str, value: &str| Note {
        note: uid.to_string(),
        value: value.to_string(),
        stored_by: None,
    };
    let notes: Vec<Note> = vec![
        note("Note0000001", "Stored"),
        note("Note0000002", ""),
        note("Note0000003", "New"),
        note("", "Generated"),
    ];

    let comments: Vec<TrackedEntityComment> = to_comments(&preheat, &notes, Some("tracker"), NOW);

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].uid, "Note0000003");
    assert_eq!(comments[0].creator.as_deref(), Some("tracker"));
    assert!(is_valid_uid(&comments[1].uid));
    assert_eq!(comments[1].comment_text, "Generated");
}

#[test]
fn test_generated_uids_are_well_formed() {
    for _ in 0..100 {
        assert!(is_valid_uid(&generate_uid()));
    }
}
