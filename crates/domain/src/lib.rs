// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod id_scheme;
mod metadata;
mod mode;
mod model;
mod payload;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use id_scheme::{TrackerIdScheme, TrackerIdSchemeParam, TrackerIdentifierParams};
pub use metadata::{
    AttributeValue, CategoryOption, CategoryOptionCombo, DataElement, FileResource,
    IdentifiableObject, Metadata, MetadataKind, MetadataObject, OrganisationUnit, Program,
    ProgramStage, ProgramType, RelationshipType, TrackedEntityAttribute, TrackedEntityType, User,
    ValueType,
};
pub use mode::{
    AtomicMode, FlushMode, TrackerBundleMode, TrackerImportStrategy, TrackerType, ValidationMode,
};
pub use model::{
    EventDataValue, ProgramInstance, ProgramOwner, ProgramStageInstance, RelationshipInstance,
    TrackedEntityAttributeValue, TrackedEntityComment, TrackedEntityInstance, TrackerModel,
};
pub use payload::{
    Attribute, DataValue, Enrollment, EnrollmentStatus, Event, EventStatus, Note, Relationship,
    RelationshipItem, TrackedEntity, TrackerDto,
};
pub use validation::{UID_LENGTH, is_valid_uid};
