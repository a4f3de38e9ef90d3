// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    DEFAULT_COMBO, ORG_UNIT, PROGRAM, PROGRAM_STAGE, STORED_ENROLLMENT, STORED_TRACKED_ENTITY,
    TEXT_ATTRIBUTE, TRACKED_ENTITY, USER, create_test_bundle, create_test_snapshot,
    create_test_store, create_test_tracked_entity, prepare,
};
use crate::{InMemoryStore, StoreSnapshot};
use std::collections::BTreeSet;
use tracker::{IdentityService, PreheatSource, TrackerBundle};
use tracker_domain::{
    CategoryOptionCombo, MetadataKind, MetadataObject, TrackedEntityInstance,
    TrackerIdSchemeParam, TrackerImportStrategy, User,
};

fn uids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn test_metadata_is_found_by_code() {
    let store: InMemoryStore = create_test_store();

    let found: Vec<MetadataObject> = store
        .find_metadata(
            MetadataKind::Program,
            &TrackerIdSchemeParam::CODE,
            &uids(&["CHILD", PROGRAM]),
        )
        .unwrap();

    assert_eq!(found.len(), 1);
    assert!(matches!(&found[0], MetadataObject::Program(program) if program.uid == PROGRAM));
}

#[test]
fn test_metadata_of_other_kinds_is_not_matched() {
    let store: InMemoryStore = create_test_store();

    let found: Vec<MetadataObject> = store
        .find_metadata(
            MetadataKind::Program,
            &TrackerIdSchemeParam::UID,
            &uids(&[ORG_UNIT]),
        )
        .unwrap();

    assert!(found.is_empty());
}

#[test]
fn test_category_option_combo_needs_exact_options() {
    let mut snapshot: StoreSnapshot = create_test_snapshot();
    snapshot.category_option_combos.push(CategoryOptionCombo {
        uid: String::from("CatCombo002"),
        code: None,
        name: String::from("Male, Urban"),
        attribute_values: Vec::new(),
        category_options: vec![String::from("CatOpt00001"), String::from("CatOpt00002")],
        is_default: false,
    });
    let store: InMemoryStore = InMemoryStore::from_snapshot(snapshot);

    let exact: Option<CategoryOptionCombo> = store
        .find_category_option_combo(&uids(&["CatOpt00002", "CatOpt00001"]))
        .unwrap();
    let partial: Option<CategoryOptionCombo> = store
        .find_category_option_combo(&uids(&["CatOpt00001"]))
        .unwrap();

    assert_eq!(exact.map(|combo| combo.uid).as_deref(), Some("CatCombo002"));
    assert!(partial.is_none());
}

#[test]
fn test_default_category_option_combo() {
    let store: InMemoryStore = create_test_store();

    let combo: Option<CategoryOptionCombo> = store.find_default_category_option_combo().unwrap();

    assert_eq!(combo.map(|combo| combo.uid).as_deref(), Some(DEFAULT_COMBO));
}

#[test]
fn test_tracked_entities_carry_their_values() {
    let store: InMemoryStore = create_test_store();

    let found: Vec<TrackedEntityInstance> = store
        .find_tracked_entities(&uids(&[STORED_TRACKED_ENTITY, TRACKED_ENTITY]))
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].attribute_values.len(), 1);
    assert_eq!(found[0].attribute_values[0].attribute, TEXT_ATTRIBUTE);
}

#[test]
fn test_enrollments_with_events() {
    let store: InMemoryStore = create_test_store();

    let with_events: Vec<String> = store
        .find_enrollments_with_events(&uids(&[STORED_ENROLLMENT]))
        .unwrap();
    let stages: Vec<(String, String)> = store
        .find_program_stages_with_events(&uids(&[STORED_ENROLLMENT]))
        .unwrap();

    assert_eq!(with_events, vec![STORED_ENROLLMENT.to_string()]);
    assert_eq!(
        stages,
        vec![(PROGRAM_STAGE.to_string(), STORED_ENROLLMENT.to_string())]
    );
}

#[test]
fn test_deleted_events_are_not_counted() {
    let mut snapshot: StoreSnapshot = create_test_snapshot();
    for event in &mut snapshot.events {
        event.deleted = true;
    }
    let store: InMemoryStore = InMemoryStore::from_snapshot(snapshot);

    let with_events: Vec<String> = store
        .find_enrollments_with_events(&uids(&[STORED_ENROLLMENT]))
        .unwrap();
    let stages: Vec<(String, String)> = store
        .find_program_stages_with_events(&uids(&[STORED_ENROLLMENT]))
        .unwrap();

    assert!(with_events.is_empty());
    assert!(stages.is_empty());
}

#[test]
fn test_users_are_found_by_username() {
    let store: InMemoryStore = create_test_store();

    let found: Vec<User> = store.find_users(&uids(&["tracker", "nobody"])).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uid, USER);
}

#[test]
fn test_identity_service() {
    let store: InMemoryStore = create_test_store();

    assert_eq!(store.current_user().map(|user| user.uid).as_deref(), Some(USER));
    assert!(store.user_by_uid(USER).is_some());
    assert!(store.user_by_uid("Missing0001").is_none());
}

#[test]
fn test_no_current_user_without_session() {
    let store: InMemoryStore = InMemoryStore::new();

    assert!(store.current_user().is_none());
}

#[test]
fn test_stored_tracked_entity_resolves_to_update() {
    let store: InMemoryStore = create_test_store();
    let mut bundle: TrackerBundle = create_test_bundle(TrackerImportStrategy::CreateAndUpdate);
    bundle.tracked_entities = vec![
        create_test_tracked_entity(STORED_TRACKED_ENTITY),
        create_test_tracked_entity(TRACKED_ENTITY),
    ];

    prepare(&store, &mut bundle);

    assert_eq!(
        bundle.strategy_for(&bundle.tracked_entities[0]),
        TrackerImportStrategy::Update
    );
    assert_eq!(
        bundle.strategy_for(&bundle.tracked_entities[1]),
        TrackerImportStrategy::Create
    );
    assert!(bundle.preheat.organisation_unit(ORG_UNIT).is_some());
    assert!(bundle.preheat.tracked_entity_attribute(TEXT_ATTRIBUTE).is_some());
}
