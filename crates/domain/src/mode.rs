// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Implements `as_str`, `Display` and case-insensitive `FromStr` for a
/// fieldless enum using its wire names.
///
/// The wire names are the `SCREAMING_SNAKE_CASE` names used by the import
/// payload, so the same text round-trips through serde, the CLI and logs.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the wire name of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(DomainError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// The kind of tracker object a payload entry or report record refers to.
///
/// Variants are declared in commit order, so ordered collections keyed by
/// `TrackerType` iterate in the order the commit engine processes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerType {
    /// A tracked entity (person, commodity, ...).
    TrackedEntity,
    /// An enrollment of a tracked entity into a program.
    Enrollment,
    /// An event, either standalone or within an enrollment.
    Event,
    /// A relationship between two tracker objects.
    Relationship,
}

wire_enum!(TrackerType, "tracker type", {
    TrackedEntity => "TRACKED_ENTITY",
    Enrollment => "ENROLLMENT",
    Event => "EVENT",
    Relationship => "RELATIONSHIP",
});

impl TrackerType {
    /// All tracker types in commit order.
    pub const ALL: [Self; 4] = [
        Self::TrackedEntity,
        Self::Enrollment,
        Self::Event,
        Self::Relationship,
    ];
}

/// How an individual payload object should be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerImportStrategy {
    /// The object must not exist yet.
    Create,
    /// The object must already exist.
    Update,
    /// Create the object if absent, update it otherwise.
    #[default]
    CreateAndUpdate,
    /// Remove (soft-delete) an existing object.
    Delete,
}

wire_enum!(TrackerImportStrategy, "import strategy", {
    Create => "CREATE",
    Update => "UPDATE",
    CreateAndUpdate => "CREATE_AND_UPDATE",
    Delete => "DELETE",
});

impl TrackerImportStrategy {
    /// Returns whether this strategy is strictly `CREATE`.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    /// Returns whether this strategy is strictly `UPDATE`.
    #[must_use]
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Update)
    }

    /// Returns whether this strategy may create or update.
    #[must_use]
    pub const fn is_create_and_update(&self) -> bool {
        matches!(self, Self::CreateAndUpdate)
    }

    /// Returns whether this strategy is `DELETE`.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        matches!(self, Self::Delete)
    }
}

/// Whether a bundle is committed or only validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerBundleMode {
    /// Validate and persist.
    #[default]
    Commit,
    /// Validate only; storage is never written.
    Validate,
}

wire_enum!(TrackerBundleMode, "import mode", {
    Commit => "COMMIT",
    Validate => "VALIDATE",
});

/// How the validation hook chain reacts to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
    /// Run every hook and collect every error.
    #[default]
    Full,
    /// Stop the hook chain at the first error.
    FailFast,
    /// Skip validation entirely (superusers only).
    Skip,
}

wire_enum!(ValidationMode, "validation mode", {
    Full => "FULL",
    FailFast => "FAIL_FAST",
    Skip => "SKIP",
});

/// When the commit engine flushes pending writes to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlushMode {
    /// Flush once per tracker type.
    #[default]
    Auto,
    /// Flush after every persisted object.
    Object,
}

wire_enum!(FlushMode, "flush mode", {
    Auto => "AUTO",
    Object => "OBJECT",
});

/// Whether a bundle with validation errors is committed partially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AtomicMode {
    /// Any validation error prevents the whole commit.
    All,
    /// Invalid objects are dropped and the remaining ones are committed.
    #[default]
    Object,
}

wire_enum!(AtomicMode, "atomic mode", {
    All => "ALL",
    Object => "OBJECT",
});
