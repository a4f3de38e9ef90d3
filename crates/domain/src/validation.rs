// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The length of every system identifier.
pub const UID_LENGTH: usize = 11;

/// Validates the format of a system identifier.
///
/// A valid uid is exactly 11 ASCII alphanumeric characters and starts with a
/// letter.
///
/// # Arguments
///
/// * `uid` - The identifier to check
///
/// # Returns
///
/// `true` if the identifier has a valid format.
#[must_use]
pub fn is_valid_uid(uid: &str) -> bool {
    let mut chars = uid.chars();
    let starts_with_letter: bool = chars.next().is_some_and(|c| c.is_ascii_alphabetic());

    starts_with_letter
        && uid.len() == UID_LENGTH
        && uid.chars().all(|c| c.is_ascii_alphanumeric())
}
