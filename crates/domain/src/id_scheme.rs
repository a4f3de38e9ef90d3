// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::metadata::IdentifiableObject;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The property used to identify metadata referenced by a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerIdScheme {
    /// The 11 character system identifier.
    #[default]
    Uid,
    /// The optional, unique business code.
    Code,
    /// The display name.
    Name,
    /// The value of a metadata attribute.
    Attribute,
}

impl TrackerIdScheme {
    /// Returns the wire name of this scheme.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uid => "UID",
            Self::Code => "CODE",
            Self::Name => "NAME",
            Self::Attribute => "ATTRIBUTE",
        }
    }
}

/// An identifier scheme together with its attribute, if any.
///
/// The textual form is `UID`, `CODE`, `NAME` or `ATTRIBUTE:<attribute uid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackerIdSchemeParam {
    id_scheme: TrackerIdScheme,
    attribute_uid: Option<String>,
}

impl TrackerIdSchemeParam {
    /// Identify objects by uid.
    pub const UID: Self = Self {
        id_scheme: TrackerIdScheme::Uid,
        attribute_uid: None,
    };

    /// Identify objects by code.
    pub const CODE: Self = Self {
        id_scheme: TrackerIdScheme::Code,
        attribute_uid: None,
    };

    /// Identify objects by name.
    pub const NAME: Self = Self {
        id_scheme: TrackerIdScheme::Name,
        attribute_uid: None,
    };

    /// Identify objects by the value they hold for the given metadata attribute.
    #[must_use]
    pub fn of_attribute(attribute_uid: impl Into<String>) -> Self {
        Self {
            id_scheme: TrackerIdScheme::Attribute,
            attribute_uid: Some(attribute_uid.into()),
        }
    }

    /// Returns the underlying scheme.
    #[must_use]
    pub const fn id_scheme(&self) -> TrackerIdScheme {
        self.id_scheme
    }

    /// Returns the attribute uid for the `ATTRIBUTE` scheme.
    #[must_use]
    pub fn attribute_uid(&self) -> Option<&str> {
        self.attribute_uid.as_deref()
    }

    /// Returns the identifier of `object` under this scheme.
    ///
    /// Returns `None` when the object has no value for the scheme, e.g. an
    /// object without a code under the `CODE` scheme.
    #[must_use]
    pub fn identify<T: IdentifiableObject + ?Sized>(&self, object: &T) -> Option<String> {
        match self.id_scheme {
            TrackerIdScheme::Uid => Some(object.uid().to_string()),
            TrackerIdScheme::Code => object.code().map(str::to_string),
            TrackerIdScheme::Name => Some(object.name().to_string()),
            TrackerIdScheme::Attribute => {
                let attribute_uid: &str = self.attribute_uid.as_deref()?;
                object
                    .attribute_values()
                    .iter()
                    .find(|value| value.attribute == attribute_uid)
                    .map(|value| value.value.clone())
            }
        }
    }
}

impl Default for TrackerIdSchemeParam {
    fn default() -> Self {
        Self::UID
    }
}

impl std::fmt::Display for TrackerIdSchemeParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.attribute_uid {
            Some(uid) => write!(f, "{}:{uid}", self.id_scheme.as_str()),
            None => f.write_str(self.id_scheme.as_str()),
        }
    }
}

impl FromStr for TrackerIdSchemeParam {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, attribute) = match s.split_once(':') {
            Some((scheme, attribute)) => (scheme, Some(attribute.trim())),
            None => (s, None),
        };

        match scheme.trim().to_ascii_uppercase().as_str() {
            "UID" if attribute.is_none() => Ok(Self::UID),
            "CODE" if attribute.is_none() => Ok(Self::CODE),
            "NAME" if attribute.is_none() => Ok(Self::NAME),
            "ATTRIBUTE" => match attribute {
                Some(uid) if !uid.is_empty() => Ok(Self::of_attribute(uid)),
                _ => Err(DomainError::MissingSchemeAttribute),
            },
            _ => Err(DomainError::InvalidIdScheme(s.to_string())),
        }
    }
}

impl TryFrom<String> for TrackerIdSchemeParam {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TrackerIdSchemeParam> for String {
    fn from(value: TrackerIdSchemeParam) -> Self {
        value.to_string()
    }
}

/// The identifier schemes used for each kind of reference in a payload.
///
/// Unset per-kind schemes fall back to `id_scheme`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerIdentifierParams {
    /// The general scheme, also used for tracker objects themselves.
    pub id_scheme: TrackerIdSchemeParam,
    /// Scheme for organisation units.
    pub org_unit_id_scheme: Option<TrackerIdSchemeParam>,
    /// Scheme for programs.
    pub program_id_scheme: Option<TrackerIdSchemeParam>,
    /// Scheme for program stages.
    pub program_stage_id_scheme: Option<TrackerIdSchemeParam>,
    /// Scheme for data elements.
    pub data_element_id_scheme: Option<TrackerIdSchemeParam>,
    /// Scheme for category option combos.
    pub category_option_combo_id_scheme: Option<TrackerIdSchemeParam>,
    /// Scheme for category options.
    pub category_option_id_scheme: Option<TrackerIdSchemeParam>,
}

impl TrackerIdentifierParams {
    /// Returns the effective scheme for organisation units.
    #[must_use]
    pub fn org_unit(&self) -> &TrackerIdSchemeParam {
        self.org_unit_id_scheme.as_ref().unwrap_or(&self.id_scheme)
    }

    /// Returns the effective scheme for programs.
    #[must_use]
    pub fn program(&self) -> &TrackerIdSchemeParam {
        self.program_id_scheme.as_ref().unwrap_or(&self.id_scheme)
    }

    /// Returns the effective scheme for program stages.
    #[must_use]
    pub fn program_stage(&self) -> &TrackerIdSchemeParam {
        self.program_stage_id_scheme
            .as_ref()
            .unwrap_or(&self.id_scheme)
    }

    /// Returns the effective scheme for data elements.
    #[must_use]
    pub fn data_element(&self) -> &TrackerIdSchemeParam {
        self.data_element_id_scheme
            .as_ref()
            .unwrap_or(&self.id_scheme)
    }

    /// Returns the effective scheme for category option combos.
    #[must_use]
    pub fn category_option_combo(&self) -> &TrackerIdSchemeParam {
        self.category_option_combo_id_scheme
            .as_ref()
            .unwrap_or(&self.id_scheme)
    }

    /// Returns the effective scheme for category options.
    #[must_use]
    pub fn category_option(&self) -> &TrackerIdSchemeParam {
        self.category_option_id_scheme
            .as_ref()
            .unwrap_or(&self.id_scheme)
    }
}
