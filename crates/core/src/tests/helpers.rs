// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{TrackerBundle, TrackerPreheat, TrackerValidationService};
use std::collections::BTreeSet;
use tracker_domain::{
    Attribute, CategoryOption, CategoryOptionCombo, DataElement, DataValue, Enrollment, Event,
    FileResource, OrganisationUnit, Program, ProgramStage, ProgramType, Relationship,
    RelationshipItem, RelationshipType, TrackedEntity, TrackedEntityAttribute, TrackedEntityType,
    TrackerIdSchemeParam, TrackerImportStrategy, User, ValueType,
};
use tracker_report::TrackerValidationReport;

pub const ORG_UNIT: &str = "OrgUnit0001";
pub const PROGRAM: &str = "Program0001";
pub const EVENT_PROGRAM: &str = "Program0002";
pub const PROGRAM_STAGE: &str = "PrgStage001";
pub const EVENT_PROGRAM_STAGE: &str = "PrgStage002";
pub const TRACKED_ENTITY_TYPE: &str = "TeType00001";
pub const TEXT_ATTRIBUTE: &str = "AttrText001";
pub const FILE_ATTRIBUTE: &str = "AttrFile001";
pub const TEXT_DATA_ELEMENT: &str = "DataElem001";
pub const FILE_DATA_ELEMENT: &str = "DataElem002";
pub const RELATIONSHIP_TYPE: &str = "RelType0001";
pub const DEFAULT_COMBO: &str = "CatCombo001";
pub const COMBO: &str = "CatCombo002";
pub const CATEGORY_OPTION: &str = "CatOption01";
pub const FILE: &str = "FileRes0001";
pub const ASSIGNED_FILE: &str = "FileRes0002";

pub const TRACKED_ENTITY: &str = "TrackEnt001";
pub const ENROLLMENT: &str = "Enrollmt001";
pub const EVENT: &str = "EventUid001";
pub const RELATIONSHIP: &str = "Relation001";

pub fn create_test_user() -> User {
    User::new("UserUid0001", "tracker")
}

pub fn create_test_superuser() -> User {
    User {
        superuser: true,
        ..User::new("UserUid0002", "admin")
    }
}

/// A preheat holding every metadata object the test payloads reference.
pub fn create_test_preheat() -> TrackerPreheat {
    let uid: &TrackerIdSchemeParam = &TrackerIdSchemeParam::UID;
    let mut preheat: TrackerPreheat = TrackerPreheat::default();

    preheat.put(
        uid,
        OrganisationUnit {
            uid: ORG_UNIT.to_string(),
            code: Some(String::from("OU_NORTH")),
            name: String::from("North clinic"),
            attribute_values: Vec::new(),
        },
    );
    preheat.put(
        uid,
        Program {
            uid: PROGRAM.to_string(),
            code: None,
            name: String::from("Child programme"),
            attribute_values: Vec::new(),
            program_type: ProgramType::WithRegistration,
            tracked_entity_type: Some(TRACKED_ENTITY_TYPE.to_string()),
            org_units: vec![ORG_UNIT.to_string()],
        },
    );
    preheat.put(
        uid,
        Program {
            uid: EVENT_PROGRAM.to_string(),
            code: None,
            name: String::from("Inpatient morbidity"),
            attribute_values: Vec::new(),
            program_type: ProgramType::WithoutRegistration,
            tracked_entity_type: None,
            org_units: vec![ORG_UNIT.to_string()],
        },
    );
    preheat.put(uid, create_test_program_stage(PROGRAM_STAGE, PROGRAM));
    preheat.put(
        uid,
        create_test_program_stage(EVENT_PROGRAM_STAGE, EVENT_PROGRAM),
    );
    preheat.put(
        uid,
        TrackedEntityType {
            uid: TRACKED_ENTITY_TYPE.to_string(),
            code: None,
            name: String::from("Person"),
            attribute_values: Vec::new(),
        },
    );
    preheat.put(
        uid,
        create_test_attribute(TEXT_ATTRIBUTE, ValueType::Text),
    );
    preheat.put(
        uid,
        create_test_attribute(FILE_ATTRIBUTE, ValueType::FileResource),
    );
    preheat.put(
        uid,
        create_test_data_element(TEXT_DATA_ELEMENT, ValueType::Text),
    );
    preheat.put(
        uid,
        create_test_data_element(FILE_DATA_ELEMENT, ValueType::Image),
    );
    preheat.put(
        uid,
        RelationshipType {
            uid: RELATIONSHIP_TYPE.to_string(),
            code: None,
            name: String::from("Mother-child"),
            attribute_values: Vec::new(),
        },
    );
    preheat.put(uid, create_test_file_resource(FILE, false));
    preheat.put(uid, create_test_file_resource(ASSIGNED_FILE, true));
    preheat.put(
        uid,
        CategoryOption {
            uid: CATEGORY_OPTION.to_string(),
            code: None,
            name: String::from("Partner A"),
            attribute_values: Vec::new(),
        },
    );
    preheat.put_category_option_combo_for_options(
        &BTreeSet::from([CATEGORY_OPTION.to_string()]),
        create_test_combo(COMBO, false),
    );
    preheat.set_default_category_option_combo(create_test_combo(DEFAULT_COMBO, true));
    preheat.put_user(create_test_user());
    preheat
}

pub fn create_test_program_stage(uid: &str, program: &str) -> ProgramStage {
    ProgramStage {
        uid: uid.to_string(),
        code: None,
        name: format!("Stage {uid}"),
        attribute_values: Vec::new(),
        program: program.to_string(),
        repeatable: true,
    }
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

pub fn create_test_combo(uid: &str, is_default: bool) -> CategoryOptionCombo {
    CategoryOptionCombo {
        uid: uid.to_string(),
        code: None,
        name: if is_default {
            String::from("default")
        } else {
            format!("Combo {uid}")
        },
        attribute_values: Vec::new(),
        category_options: if is_default {
            Vec::new()
        } else {
            vec![CATEGORY_OPTION.to_string()]
        },
        is_default,
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
    let item = |tracked_entity: &str| RelationshipItem {
        tracked_entity: Some(tracked_entity.to_string()),
        ..RelationshipItem::default()
    };
    Relationship {
        relationship_type: RELATIONSHIP_TYPE.to_string(),
        from: Some(item(from)),
        to: Some(item(to)),
        ..Relationship::new(uid)
    }
}

/// An empty bundle for the test user with a full test preheat.
pub fn create_test_bundle(strategy: TrackerImportStrategy) -> TrackerBundle {
    TrackerBundle {
        user: Some(create_test_user()),
        import_strategy: strategy,
        preheat: create_test_preheat(),
        ..TrackerBundle::default()
    }
}

/// Registers the payload objects as preheat references, the way the preheat
/// builder does.
pub fn register_payload_references(bundle: &mut TrackerBundle) {
    let preheat: &mut TrackerPreheat = &mut bundle.preheat;
    for tracked_entity in &bundle.tracked_entities {
        preheat.put_reference(&tracked_entity.tracked_entity, None);
    }
    for enrollment in &bundle.enrollments {
        preheat.put_reference(
            &enrollment.enrollment,
            Some(enrollment.tracked_entity.clone()),
        );
    }
    for event in &bundle.events {
        preheat.put_reference(&event.event, event.enrollment.clone());
    }
    for relationship in &bundle.relationships {
        preheat.put_reference(&relationship.relationship, None);
    }
}

/// Registers references, resolves strategies and runs the built-in general
/// hook chain.
pub fn validate(bundle: &mut TrackerBundle) -> TrackerValidationReport {
    register_payload_references(bundle);
    bundle.resolve_strategies();
    TrackerValidationService::default().validate(bundle)
}
