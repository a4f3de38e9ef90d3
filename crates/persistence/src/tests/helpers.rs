// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CommitConfig, InMemoryStore, PersistenceError, StoreSnapshot, TrackerCommitService};
use std::collections::BTreeMap;
use time::macros::datetime;
use tracker::TrackerBundle;
use tracker::preheat::preheat;
use tracker_domain::{
    Attribute, CategoryOptionCombo, DataElement, DataValue, Enrollment, Event, FileResource,
    OrganisationUnit, Program, ProgramInstance, ProgramStage, ProgramStageInstance, ProgramType,
    Relationship, RelationshipInstance, RelationshipItem, RelationshipType, TrackedEntity,
    TrackedEntityAttribute, TrackedEntityAttributeValue, TrackedEntityInstance, TrackedEntityType,
    TrackerImportStrategy, User, ValueType,
};
use tracker_report::TrackerBundleReport;

pub const ORG_UNIT: &str = "OrgUnit0001";
pub const PROGRAM: &str = "Program0001";
pub const PROGRAM_STAGE: &str = "PrgStage001";
pub const TRACKED_ENTITY_TYPE: &str = "TeType00001";
pub const TEXT_ATTRIBUTE: &str = "AttrText001";
pub const FILE_ATTRIBUTE: &str = "AttrFile001";
pub const GENERATED_ATTRIBUTE: &str = "AttrGen0001";
pub const TEXT_DATA_ELEMENT: &str = "DataElem001";
pub const FILE_DATA_ELEMENT: &str = "DataElem002";
pub const RELATIONSHIP_TYPE: &str = "RelType0001";
pub const DEFAULT_COMBO: &str = "CatCombo001";
pub const FILE: &str = "FileRes0001";
pub const ASSIGNED_FILE: &str = "FileRes0002";
pub const TEXT_PATTERN: &str = "\"MRN-\" + SEQUENTIAL(###)";
pub const USER: &str = "UserUid0001";

pub const TRACKED_ENTITY: &str = "TrackEnt001";
pub const ENROLLMENT: &str = "Enrollmt001";
pub const EVENT: &str = "EventUid001";
pub const RELATIONSHIP: &str = "Relation001";

/// Stored objects the tests update or reference.
pub const STORED_TRACKED_ENTITY: &str = "StoredTe001";
pub const STORED_ENROLLMENT: &str = "StoredEn001";
pub const STORED_EVENT: &str = "StoredEv001";
pub const STORED_RELATIONSHIP: &str = "StoredRel01";

pub fn create_test_user() -> User {
    User::new(USER, "tracker")
}

pub fn create_test_attribute(uid: &str, value_type: ValueType) -> TrackedEntityAttribute {
    TrackedEntityAttribute {
        uid: uid.to_string(),
        code: None,
        name: format!("Attribute {uid}"),
        attribute_values: Vec::new(),
        value_type,
        generated: false,
        text_pattern: None,
        unique: false,
    }
}

pub fn create_test_data_element(uid: &str, value_type: ValueType) -> DataElement {
    DataElement {
        uid: uid.to_string(),
        code: None,
        name: format!("Data element {uid}"),
        attribute_values: Vec::new(),
        value_type,
    }
}

pub fn create_test_file_resource(uid: &str, assigned: bool) -> FileResource {
    FileResource {
        uid: uid.to_string(),
        code: None,
        name: format!("{uid}.png"),
        attribute_values: Vec::new(),
        assigned,
    }
}

/// A stored tracked entity with a text attribute value.
pub fn create_test_stored_tracked_entity() -> TrackedEntityInstance {
    TrackedEntityInstance {
        tracked_entity_type: TRACKED_ENTITY_TYPE.to_string(),
        organisation_unit: ORG_UNIT.to_string(),
        created: Some(datetime!(2025-01-01 00:00 UTC)),
        attribute_values: vec![TrackedEntityAttributeValue {
            attribute: TEXT_ATTRIBUTE.to_string(),
            value: String::from("Stored"),
            stored_by: Some(String::from("tracker")),
            created: Some(datetime!(2025-01-01 00:00 UTC)),
            last_updated: Some(datetime!(2025-01-01 00:00 UTC)),
        }],
        ..TrackedEntityInstance::new(STORED_TRACKED_ENTITY)
    }
}

/// Metadata for every test payload plus one stored tracked entity, with an
/// enrollment, an event and a relationship.
pub fn create_test_snapshot() -> StoreSnapshot {
    let generated: TrackedEntityAttribute = TrackedEntityAttribute {
        generated: true,
        text_pattern: Some(TEXT_PATTERN.to_string()),
        ..create_test_attribute(GENERATED_ATTRIBUTE, ValueType::Text)
    };

    StoreSnapshot {
        organisation_units: vec![OrganisationUnit {
            uid: ORG_UNIT.to_string(),
            code: Some(String::from("OU_NORTH")),
            name: String::from("North clinic"),
            attribute_values: Vec::new(),
        }],
        programs: vec![Program {
            uid: PROGRAM.to_string(),
            code: Some(String::from("CHILD")),
            name: String::from("Child programme"),
            attribute_values: Vec::new(),
            program_type: ProgramType::WithRegistration,
            tracked_entity_type: Some(TRACKED_ENTITY_TYPE.to_string()),
            org_units: vec![ORG_UNIT.to_string()],
        }],
        program_stages: vec![ProgramStage {
            uid: PROGRAM_STAGE.to_string(),
            code: None,
            name: String::from("Birth"),
            attribute_values: Vec::new(),
            program: PROGRAM.to_string(),
            repeatable: false,
        }],
        tracked_entity_types: vec![TrackedEntityType {
            uid: TRACKED_ENTITY_TYPE.to_string(),
            code: None,
            name: String::from("Person"),
            attribute_values: Vec::new(),
        }],
        tracked_entity_attributes: vec![
            create_test_attribute(TEXT_ATTRIBUTE, ValueType::Text),
            create_test_attribute(FILE_ATTRIBUTE, ValueType::FileResource),
            generated,
        ],
        data_elements: vec![
            create_test_data_element(TEXT_DATA_ELEMENT, ValueType::Text),
            create_test_data_element(FILE_DATA_ELEMENT, ValueType::Image),
        ],
        relationship_types: vec![RelationshipType {
            uid: RELATIONSHIP_TYPE.to_string(),
            code: None,
            name: String::from("Mother of"),
            attribute_values: Vec::new(),
        }],
        category_option_combos: vec![CategoryOptionCombo {
            uid: DEFAULT_COMBO.to_string(),
            code: None,
            name: String::from("default"),
            attribute_values: Vec::new(),
            category_options: Vec::new(),
            is_default: true,
        }],
        file_resources: vec![
            create_test_file_resource(FILE, false),
            create_test_file_resource(ASSIGNED_FILE, true),
        ],
        users: vec![create_test_user()],
        current_user: Some(USER.to_string()),
        tracked_entities: vec![create_test_stored_tracked_entity()],
        enrollments: vec![ProgramInstance {
            tracked_entity: Some(STORED_TRACKED_ENTITY.to_string()),
            program: PROGRAM.to_string(),
            organisation_unit: ORG_UNIT.to_string(),
            ..ProgramInstance::new(STORED_ENROLLMENT)
        }],
        events: vec![ProgramStageInstance {
            program_instance: Some(STORED_ENROLLMENT.to_string()),
            program_stage: PROGRAM_STAGE.to_string(),
            organisation_unit: ORG_UNIT.to_string(),
            attribute_option_combo: Some(DEFAULT_COMBO.to_string()),
            ..ProgramStageInstance::new(STORED_EVENT)
        }],
        relationships: vec![RelationshipInstance {
            relationship_type: RELATIONSHIP_TYPE.to_string(),
            from: item(STORED_TRACKED_ENTITY),
            to: item(STORED_TRACKED_ENTITY),
            ..RelationshipInstance::new(STORED_RELATIONSHIP)
        }],
        reserved_values: BTreeMap::from([(
            TEXT_PATTERN.to_string(),
            vec![String::from("MRN-001"), String::from("MRN-002")],
        )]),
        ..StoreSnapshot::default()
    }
}

pub fn create_test_store() -> InMemoryStore {
    InMemoryStore::from_snapshot(create_test_snapshot())
}

fn item(tracked_entity: &str) -> RelationshipItem {
    RelationshipItem {
        tracked_entity: Some(tracked_entity.to_string()),
        ..RelationshipItem::default()
    }
}

pub fn create_test_tracked_entity(uid: &str) -> TrackedEntity {
    TrackedEntity {
        tracked_entity_type: TRACKED_ENTITY_TYPE.to_string(),
        org_unit: ORG_UNIT.to_string(),
        attributes: vec![Attribute::new(TEXT_ATTRIBUTE, "Jane")],
        ..TrackedEntity::new(uid)
    }
}

pub fn create_test_enrollment(uid: &str, tracked_entity: &str) -> Enrollment {
    Enrollment {
        tracked_entity: tracked_entity.to_string(),
        program: PROGRAM.to_string(),
        org_unit: ORG_UNIT.to_string(),
        ..Enrollment::new(uid)
    }
}

pub fn create_test_event(uid: &str, enrollment: &str) -> Event {
    Event {
        enrollment: Some(enrollment.to_string()),
        program: PROGRAM.to_string(),
        program_stage: PROGRAM_STAGE.to_string(),
        org_unit: ORG_UNIT.to_string(),
        data_values: vec![DataValue::new(TEXT_DATA_ELEMENT, "42")],
        ..Event::new(uid)
    }
}

pub fn create_test_relationship(uid: &str, from: &str, to: &str) -> Relationship {
    Relationship {
        relationship_type: RELATIONSHIP_TYPE.to_string(),
        from: Some(item(from)),
        to: Some(item(to)),
        ..Relationship::new(uid)
    }
}

/// An empty bundle for the test user.
pub fn create_test_bundle(strategy: TrackerImportStrategy) -> TrackerBundle {
    let mut bundle: TrackerBundle = TrackerBundle::new(Some(create_test_user()));
    bundle.import_strategy = strategy;
    bundle
}

/// Preheats `bundle` from `store` and resolves its strategies.
pub fn prepare(store: &InMemoryStore, bundle: &mut TrackerBundle) {
    bundle.preheat = preheat(store, bundle).unwrap();
    bundle.resolve_strategies();
}

/// Commits `bundle` to `store` without hooks or side-effect handlers.
pub fn commit(
    store: &InMemoryStore,
    bundle: &mut TrackerBundle,
) -> Result<TrackerBundleReport, PersistenceError> {
    TrackerCommitService::new(store.clone(), CommitConfig::default()).commit(bundle)
}
