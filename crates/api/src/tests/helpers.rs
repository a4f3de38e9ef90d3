// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::TrackerImportParams;
use time::macros::datetime;
use tracker_domain::{
    Attribute, CategoryOptionCombo, DataElement, DataValue, Enrollment, Event, OrganisationUnit,
    Program, ProgramInstance, ProgramStage, ProgramType, TrackedEntity, TrackedEntityAttribute,
    TrackedEntityAttributeValue, TrackedEntityInstance, TrackedEntityType, User, ValueType,
};
use tracker_persistence::{InMemoryStore, StoreSnapshot};

pub const ORG_UNIT: &str = "OrgUnit0001";
pub const PROGRAM: &str = "Program0001";
pub const PROGRAM_STAGE: &str = "PrgStage001";
pub const TRACKED_ENTITY_TYPE: &str = "TeType00001";
pub const TEXT_ATTRIBUTE: &str = "AttrText001";
pub const TEXT_DATA_ELEMENT: &str = "DataElem001";
pub const DEFAULT_COMBO: &str = "CatCombo001";

pub const USER: &str = "UserUid0001";
pub const ADMIN: &str = "AdminUid001";
pub const CLERK: &str = "ClerkUid001";

pub const STORED_TRACKED_ENTITY: &str = "StoredTe001";
pub const STORED_ENROLLMENT: &str = "StoredEn001";
pub const DELETED_ENROLLMENT: &str = "DeletedEn01";

pub fn create_test_user() -> User {
    User::new(USER, "tracker")
}

/// Reference data, three users and one stored tracked entity with a live and
/// a soft-deleted enrollment. `tracker` is the session user.
pub fn create_test_snapshot() -> StoreSnapshot {
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
        tracked_entity_attributes: vec![TrackedEntityAttribute {
            uid: TEXT_ATTRIBUTE.to_string(),
            code: None,
            name: String::from("First name"),
            attribute_values: Vec::new(),
            value_type: ValueType::Text,
            generated: false,
            text_pattern: None,
            unique: false,
        }],
        data_elements: vec![DataElement {
            uid: TEXT_DATA_ELEMENT.to_string(),
            code: None,
            name: String::from("Weight"),
            attribute_values: Vec::new(),
            value_type: ValueType::Text,
        }],
        category_option_combos: vec![CategoryOptionCombo {
            uid: DEFAULT_COMBO.to_string(),
            code: None,
            name: String::from("default"),
            attribute_values: Vec::new(),
            category_options: Vec::new(),
            is_default: true,
        }],
        users: vec![
            create_test_user(),
            User::new(CLERK, "clerk"),
            User {
                superuser: true,
                ..User::new(ADMIN, "admin")
            },
        ],
        current_user: Some(USER.to_string()),
        tracked_entities: vec![TrackedEntityInstance {
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
        }],
        enrollments: vec![
            create_test_program_instance(STORED_ENROLLMENT, false),
            create_test_program_instance(DELETED_ENROLLMENT, true),
        ],
        ..StoreSnapshot::default()
    }
}

fn create_test_program_instance(uid: &str, deleted: bool) -> ProgramInstance {
    ProgramInstance {
        tracked_entity: Some(STORED_TRACKED_ENTITY.to_string()),
        program: PROGRAM.to_string(),
        organisation_unit: ORG_UNIT.to_string(),
        deleted,
        ..ProgramInstance::new(uid)
    }
}

pub fn create_test_store() -> InMemoryStore {
    InMemoryStore::from_snapshot(create_test_snapshot())
}

pub fn create_test_tracked_entity(uid: &str, name: &str) -> TrackedEntity {
    TrackedEntity {
        tracked_entity_type: TRACKED_ENTITY_TYPE.to_string(),
        org_unit: ORG_UNIT.to_string(),
        attributes: vec![Attribute::new(TEXT_ATTRIBUTE, name)],
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

/// Default import parameters carrying `tracked_entities`.
pub fn create_test_params(tracked_entities: Vec<TrackedEntity>) -> TrackerImportParams {
    TrackerImportParams {
        tracked_entities,
        ..TrackerImportParams::default()
    }
}
