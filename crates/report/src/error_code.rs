// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Codes for validation errors and warnings.
///
/// Each code carries a message template with positional `{0}`, `{1}`, ...
/// placeholders filled from the arguments of the report record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackerErrorCode {
    E1002,
    E1005,
    E1006,
    E1009,
    E1010,
    E1011,
    E1013,
    E1030,
    E1032,
    E1033,
    E1048,
    E1049,
    E1063,
    E1068,
    E1069,
    E1070,
    E1080,
    E1081,
    E1082,
    E1084,
    E1113,
    E1114,
    E1115,
    E1119,
    E1121,
    E1122,
    E1123,
    E1124,
    E1300,
    E1304,
    E4006,
    E4012,
    E4015,
    E4016,
    E4017,
}

impl TrackerErrorCode {
    /// Returns the message template for this code.
    #[must_use]
    pub const fn message_template(&self) -> &'static str {
        match self {
            Self::E1002 => "TrackedEntity: `{0}`, already exists.",
            Self::E1005 => "Could not find TrackedEntityType: `{0}`.",
            Self::E1006 => "Attribute: `{0}`, does not exist.",
            Self::E1009 => {
                "File resource: `{0}`, has already been assigned to a different object."
            }
            Self::E1010 => "Could not find Program: `{0}`, linked to Event.",
            Self::E1011 => "Could not find OrganisationUnit: `{0}`, linked to Event.",
            Self::E1013 => "Could not find ProgramStage: `{0}`, linked to Event.",
            Self::E1030 => "Event: `{0}`, already exists.",
            Self::E1032 => "Event: `{0}`, does not exist.",
            Self::E1033 => "Event: `{0}`, Enrollment value is NULL.",
            Self::E1048 => "Object: `{0}`, uid: `{1}`, has an invalid uid format.",
            Self::E1049 => "Could not find OrganisationUnit: `{0}`, linked to Tracked Entity.",
            Self::E1063 => "TrackedEntity: `{0}`, does not exist.",
            Self::E1068 => "Could not find TrackedEntity: `{0}`, linked to Enrollment.",
            Self::E1069 => "Could not find Program: `{0}`, linked to Enrollment.",
            Self::E1070 => "Could not find OrganisationUnit: `{0}`, linked to Enrollment.",
            Self::E1080 => "Enrollment: `{0}`, already exists.",
            Self::E1081 => "Enrollment: `{0}`, does not exist.",
            Self::E1082 => "Event: `{0}`, is already deleted and can't be modified.",
            Self::E1084 => "File resource: `{0}`, reference could not be found.",
            Self::E1113 => "Enrollment: `{0}`, is already deleted and can't be modified.",
            Self::E1114 => "TrackedEntity: `{0}`, is already deleted and can't be modified.",
            Self::E1115 => "Could not find CategoryOptionCombo: `{0}`.",
            Self::E1119 => "A Tracker Note with uid `{0}` already exists.",
            Self::E1121 => "Missing required tracked entity property: `{0}`.",
            Self::E1122 => "Missing required enrollment property: `{0}`.",
            Self::E1123 => "Missing required event property: `{0}`.",
            Self::E1124 => "Missing required relationship property: `{0}`.",
            Self::E1300 => "Generated by program rule (`{0}`) - `{1}`",
            Self::E1304 => "Could not find DataElement: `{0}`.",
            Self::E4006 => "Could not find RelationshipType: `{0}`.",
            Self::E4012 => "Could not find `{0}`: `{1}`, linked to Relationship.",
            Self::E4015 => "Relationship: `{0}`, already exists.",
            Self::E4016 => "Relationship: `{0}`, does not exist.",
            Self::E4017 => "Relationship: `{0}`, is already deleted and cannot be modified.",
        }
    }

    /// Formats the message template with the given arguments.
    ///
    /// Placeholders without a matching argument are left untouched.
    #[must_use]
    pub fn format(&self, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(self.message_template().to_string(), |message, (i, arg)| {
                message.replace(&format!("{{{i}}}"), arg)
            })
    }
}

impl std::fmt::Display for TrackerErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
