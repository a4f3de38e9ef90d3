// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Metadata objects referenced by tracker payloads.
//!
//! Metadata is configuration (organisation units, programs, attributes, ...)
//! that tracker data points at. The import pipeline never writes metadata,
//! with the single exception of the `assigned` flag of file resources.

use serde::{Deserialize, Serialize};

/// A value held by a metadata object for a metadata attribute.
///
/// Used by the `ATTRIBUTE` identifier scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeValue {
    /// The uid of the metadata attribute.
    pub attribute: String,
    /// The value held for the attribute.
    pub value: String,
}

/// Common identity properties of metadata objects.
pub trait IdentifiableObject {
    /// The 11 character system identifier.
    fn uid(&self) -> &str;
    /// The optional business code.
    fn code(&self) -> Option<&str>;
    /// The display name.
    fn name(&self) -> &str;
    /// The metadata attribute values held by this object.
    fn attribute_values(&self) -> &[AttributeValue];
}

/// The type of value stored for an attribute or data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    #[default]
    Text,
    LongText,
    Number,
    Integer,
    IntegerPositive,
    Boolean,
    TrueOnly,
    Date,
    DateTime,
    Email,
    PhoneNumber,
    OrganisationUnit,
    FileResource,
    Image,
}

impl ValueType {
    /// Returns whether values of this type are file resource uids.
    #[must_use]
    pub const fn is_file_type(&self) -> bool {
        matches!(self, Self::FileResource | Self::Image)
    }
}

/// Whether a program tracks registered entities or anonymous events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgramType {
    /// Enrollments of tracked entities with events inside them.
    #[default]
    WithRegistration,
    /// Standalone events without enrollments.
    WithoutRegistration,
}

/// An organisation unit (facility, district, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUnit {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
}

/// A tracker or event program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default)]
    pub program_type: ProgramType,
    /// The tracked entity type enrolled into this program, if any.
    #[serde(default)]
    pub tracked_entity_type: Option<String>,
    /// Uids of the organisation units this program is assigned to.
    #[serde(default)]
    pub org_units: Vec<String>,
}

impl Program {
    /// Returns whether this program enrolls tracked entities.
    #[must_use]
    pub const fn is_registration(&self) -> bool {
        matches!(self.program_type, ProgramType::WithRegistration)
    }
}

/// A stage of a program, grouping events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStage {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    /// Uid of the owning program.
    pub program: String,
    #[serde(default)]
    pub repeatable: bool,
}

/// The type of a tracked entity (person, commodity, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityType {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
}

/// An attribute recorded against tracked entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityAttribute {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default)]
    pub value_type: ValueType,
    /// Values are drawn from reserved values of `text_pattern`.
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub text_pattern: Option<String>,
    #[serde(default)]
    pub unique: bool,
}

/// A data element recorded in events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElement {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    #[serde(default)]
    pub value_type: ValueType,
}

/// The type of a relationship between tracker objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipType {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
}

/// A combination of category options, used as event attribute option combo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptionCombo {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    /// Uids of the category options making up this combo.
    #[serde(default)]
    pub category_options: Vec<String>,
    /// Whether this is the system default combo.
    #[serde(default)]
    pub is_default: bool,
}

/// A single category option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
}

/// An uploaded file referenced by file-type values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attribute_values: Vec<AttributeValue>,
    /// Whether a value currently links to this file.
    #[serde(default)]
    pub assigned: bool,
}

/// A user account acting on, or referenced by, an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub username: String,
    #[serde(default)]
    pub superuser: bool,
}

impl User {
    /// Creates a regular (non-super) user.
    #[must_use]
    pub fn new(uid: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            username: username.into(),
            superuser: false,
        }
    }

    /// Returns whether this user bypasses authority checks.
    #[must_use]
    pub const fn is_super(&self) -> bool {
        self.superuser
    }
}

/// Generates [`MetadataKind`], [`MetadataObject`] and the per-type
/// [`IdentifiableObject`] and [`Metadata`] implementations from one list.
macro_rules! metadata_types {
    ($($variant:ident),+ $(,)?) => {
        /// The kind of a metadata object.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum MetadataKind {
            $($variant),+
        }

        /// Any metadata object, tagged by kind.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum MetadataObject {
            $($variant($variant)),+
        }

        impl MetadataObject {
            /// Returns the kind of the wrapped object.
            #[must_use]
            pub const fn kind(&self) -> MetadataKind {
                match self {
                    $(Self::$variant(_) => MetadataKind::$variant),+
                }
            }

            /// Returns the wrapped object as an identifiable object.
            #[must_use]
            pub fn as_identifiable(&self) -> &dyn IdentifiableObject {
                match self {
                    $(Self::$variant(object) => object),+
                }
            }
        }

        $(
            impl IdentifiableObject for $variant {
                fn uid(&self) -> &str {
                    &self.uid
                }

                fn code(&self) -> Option<&str> {
                    self.code.as_deref()
                }

                fn name(&self) -> &str {
                    &self.name
                }

                fn attribute_values(&self) -> &[AttributeValue] {
                    &self.attribute_values
                }
            }

            impl From<$variant> for MetadataObject {
                fn from(object: $variant) -> Self {
                    Self::$variant(object)
                }
            }

            impl Metadata for $variant {
                const KIND: MetadataKind = MetadataKind::$variant;

                fn from_object(object: &MetadataObject) -> Option<&Self> {
                    match object {
                        MetadataObject::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_object_mut(object: &mut MetadataObject) -> Option<&mut Self> {
                    match object {
                        MetadataObject::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

/// A metadata type that can be stored in, and retrieved from, a
/// [`MetadataObject`] slot.
pub trait Metadata: IdentifiableObject + Clone + Into<MetadataObject> {
    /// The kind tag of this type.
    const KIND: MetadataKind;

    /// Borrows the concrete object if `object` holds this type.
    fn from_object(object: &MetadataObject) -> Option<&Self>;

    /// Mutably borrows the concrete object if `object` holds this type.
    fn from_object_mut(object: &mut MetadataObject) -> Option<&mut Self>;
}

metadata_types!(
    OrganisationUnit,
    Program,
    ProgramStage,
    TrackedEntityType,
    TrackedEntityAttribute,
    DataElement,
    RelationshipType,
    CategoryOptionCombo,
    CategoryOption,
    FileResource,
);
