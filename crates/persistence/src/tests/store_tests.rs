// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    ENROLLMENT, FILE, ORG_UNIT, PROGRAM, STORED_TRACKED_ENTITY, TEXT_ATTRIBUTE, TEXT_PATTERN,
    TRACKED_ENTITY, TRACKED_ENTITY_TYPE, USER, create_test_snapshot, create_test_store,
};
use crate::{
    InMemoryStore, MemorySession, PersistenceError, StoreSnapshot, StoredObject, TrackerSession,
    TrackerStore,
};
use std::collections::BTreeSet;
use tracker::PreheatSource;
use tracker_domain::{
    MetadataKind, MetadataObject, ProgramInstance, TrackedEntityAttributeValue,
    TrackedEntityInstance, TrackerIdSchemeParam, TrackerType,
};

fn create_test_instance(uid: &str) -> TrackedEntityInstance {
    TrackedEntityInstance {
        tracked_entity_type: TRACKED_ENTITY_TYPE.to_string(),
        organisation_unit: ORG_UNIT.to_string(),
        ..TrackedEntityInstance::new(uid)
    }
}

fn create_test_program_instance(uid: &str, tracked_entity: &str) -> ProgramInstance {
    ProgramInstance {
        tracked_entity: Some(tracked_entity.to_string()),
        program: PROGRAM.to_string(),
        organisation_unit: ORG_UNIT.to_string(),
        ..ProgramInstance::new(uid)
    }
}

fn create_test_value(value: &str) -> TrackedEntityAttributeValue {
    TrackedEntityAttributeValue {
        attribute: TEXT_ATTRIBUTE.to_string(),
        value: value.to_string(),
        ..TrackedEntityAttributeValue::default()
    }
}

#[test]
fn test_writes_are_invisible_until_commit() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save(StoredObject::TrackedEntity(create_test_instance(TRACKED_ENTITY)))
        .unwrap();
    session
        .save_attribute_value(TRACKED_ENTITY, create_test_value("Jane"))
        .unwrap();
    session.flush().unwrap();

    assert!(store.tracked_entity(TRACKED_ENTITY).unwrap().is_none());

    session.commit().unwrap();

    let stored: TrackedEntityInstance = store.tracked_entity(TRACKED_ENTITY).unwrap().unwrap();
    assert_eq!(stored.attribute_values.len(), 1);
    assert_eq!(stored.attribute_values[0].value, "Jane");
}

#[test]
fn test_rollback_discards_flushed_writes() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save(StoredObject::TrackedEntity(create_test_instance(TRACKED_ENTITY)))
        .unwrap();
    session.flush().unwrap();
    assert_eq!(session.flushed(), 1);

    session.rollback();

    assert!(store.tracked_entity(TRACKED_ENTITY).unwrap().is_none());
}

#[test]
fn test_clear_drops_unflushed_writes() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save(StoredObject::TrackedEntity(create_test_instance(TRACKED_ENTITY)))
        .unwrap();
    assert_eq!(session.pending(), 1);

    session.clear();
    assert_eq!(session.pending(), 0);
    session.commit().unwrap();

    assert!(store.tracked_entity(TRACKED_ENTITY).unwrap().is_none());
}

#[test]
fn test_enrollment_without_tracked_entity_violates_foreign_key() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save(StoredObject::Enrollment(create_test_program_instance(
            ENROLLMENT,
            TRACKED_ENTITY,
        )))
        .unwrap();
    let result: Result<(), PersistenceError> = session.flush();

    assert!(matches!(
        result,
        Err(PersistenceError::ForeignKeyViolation {
            tracker_type: TrackerType::Enrollment,
            ref uid,
            ref references,
        }) if uid == ENROLLMENT && references == TRACKED_ENTITY
    ));
}

#[test]
fn test_enrollment_after_tracked_entity_in_same_flush() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save(StoredObject::TrackedEntity(create_test_instance(TRACKED_ENTITY)))
        .unwrap();
    session
        .save(StoredObject::Enrollment(create_test_program_instance(
            ENROLLMENT,
            TRACKED_ENTITY,
        )))
        .unwrap();
    session.flush().unwrap();
    session.commit().unwrap();

    let stored: ProgramInstance = store.enrollment(ENROLLMENT).unwrap().unwrap();
    assert_eq!(stored.tracked_entity.as_deref(), Some(TRACKED_ENTITY));
}

#[test]
fn test_attribute_value_without_tracked_entity_violates_foreign_key() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save_attribute_value("Missing0001", create_test_value("Jane"))
        .unwrap();

    assert!(matches!(
        session.flush(),
        Err(PersistenceError::ForeignKeyViolation {
            tracker_type: TrackerType::TrackedEntity,
            ..
        })
    ));
}

#[test]
fn test_attribute_value_of_stored_tracked_entity_is_replaced() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session
        .save_attribute_value(STORED_TRACKED_ENTITY, create_test_value("Updated"))
        .unwrap();
    session.flush().unwrap();
    session.commit().unwrap();

    let stored: TrackedEntityInstance = store
        .tracked_entity(STORED_TRACKED_ENTITY)
        .unwrap()
        .unwrap();
    assert_eq!(stored.attribute_values.len(), 1);
    assert_eq!(stored.attribute_values[0].value, "Updated");
}

#[test]
fn test_unknown_file_resource_is_not_found() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    let result: Result<(), PersistenceError> =
        session.set_file_resource_assigned("Missing0001", true);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
    assert_eq!(session.pending(), 0);
}

#[test]
fn test_file_resource_assignment_is_committed() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session.set_file_resource_assigned(FILE, true).unwrap();
    session.flush().unwrap();
    session.commit().unwrap();

    assert!(store.file_resource(FILE).unwrap().unwrap().assigned);
}

#[test]
fn test_reserved_value_is_consumed() {
    let store: InMemoryStore = create_test_store();
    let mut session: MemorySession<'_> = store.begin().unwrap();

    session.use_reserved_value(TEXT_PATTERN, "MRN-001").unwrap();
    session.flush().unwrap();
    session.commit().unwrap();

    assert_eq!(
        store.reserved_values(TEXT_PATTERN).unwrap(),
        vec![String::from("MRN-002")]
    );
}

#[test]
fn test_snapshot_is_read_from_json() {
    let json: &str = r#"{
        "users": [{ "uid": "UserUid0001", "username": "tracker" }],
        "currentUser": "UserUid0001",
        "trackedEntities": [{
            "uid": "TrackEnt001",
            "trackedEntityType": "TeType00001",
            "organisationUnit": "OrgUnit0001",
            "attributeValues": [{ "attribute": "AttrText001", "value": "Jane" }]
        }],
        "reservedValues": { "MRN": ["MRN-001"] }
    }"#;

    let snapshot: StoreSnapshot = StoreSnapshot::from_json(json).unwrap();
    let store: InMemoryStore = InMemoryStore::from_snapshot(snapshot);

    let stored: TrackedEntityInstance = store.tracked_entity(TRACKED_ENTITY).unwrap().unwrap();
    assert_eq!(stored.attribute_values[0].value, "Jane");
    assert_eq!(store.reserved_values("MRN").unwrap().len(), 1);
    assert!(store.snapshot().unwrap().programs.is_empty());
    assert_eq!(store.snapshot().unwrap().current_user.as_deref(), Some(USER));
}

#[test]
fn test_snapshot_survives_json() {
    let snapshot: StoreSnapshot = create_test_snapshot();

    let json: String = snapshot.to_json().unwrap();
    let store: InMemoryStore =
        InMemoryStore::from_snapshot(StoreSnapshot::from_json(&json).unwrap());

    let restored: StoreSnapshot = store.snapshot().unwrap();
    assert_eq!(restored.tracked_entities, snapshot.tracked_entities);
    assert_eq!(restored.file_resources.len(), snapshot.file_resources.len());
    assert_eq!(restored.programs, snapshot.programs);
}

#[test]
fn test_metadata_lookups_are_cached_until_cleared() {
    let store: InMemoryStore = create_test_store();
    let identifiers: BTreeSet<String> =
        BTreeSet::from([ORG_UNIT.to_string(), String::from("Missing0001")]);

    let found: Vec<MetadataObject> = store
        .find_metadata(
            MetadataKind::OrganisationUnit,
            &TrackerIdSchemeParam::UID,
            &identifiers,
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(store.cached_lookups(), 2);

    let again: Vec<MetadataObject> = store
        .find_metadata(
            MetadataKind::OrganisationUnit,
            &TrackerIdSchemeParam::UID,
            &identifiers,
        )
        .unwrap();
    assert_eq!(again, found);

    store.clear_cache();
    assert_eq!(store.cached_lookups(), 0);
}

#[test]
fn test_file_resources_are_never_cached() {
    let store: InMemoryStore = create_test_store();

    let found: Vec<MetadataObject> = store
        .find_metadata(
            MetadataKind::FileResource,
            &TrackerIdSchemeParam::UID,
            &BTreeSet::from([FILE.to_string()]),
        )
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(store.cached_lookups(), 0);
}
