// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tracker_domain::User;

/// Resolves the users acting on an import.
pub trait IdentityService {
    /// Loads a user by uid.
    fn user_by_uid(&self, uid: &str) -> Option<User>;

    /// Returns the user of the current session, if one is signed in.
    fn current_user(&self) -> Option<User>;
}
