// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while constructing or parsing domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier scheme string could not be parsed.
    InvalidIdScheme(String),
    /// The `ATTRIBUTE` identifier scheme was given without an attribute uid.
    MissingSchemeAttribute,
    /// A string did not name a known variant of an enumeration.
    UnknownVariant {
        /// The enumeration being parsed (e.g. "import strategy").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdScheme(value) => write!(f, "Invalid identifier scheme: '{value}'"),
            Self::MissingSchemeAttribute => {
                write!(f, "Identifier scheme ATTRIBUTE requires an attribute uid")
            }
            Self::UnknownVariant { kind, value } => write!(f, "Unknown {kind}: '{value}'"),
        }
    }
}

impl std::error::Error for DomainError {}
