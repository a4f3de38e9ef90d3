// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::TrackerErrorCode;

#[test]
fn test_format_fills_positional_arguments() {
    let message: String = TrackerErrorCode::E1048.format(&["TRACKED_ENTITY", "bad-uid"]);
    assert_eq!(
        message,
        "Object: `TRACKED_ENTITY`, uid: `bad-uid`, has an invalid uid format."
    );
}

#[test]
fn test_format_leaves_missing_arguments_untouched() {
    let message: String = TrackerErrorCode::E4012.format(&["Event"]);
    assert_eq!(message, "Could not find `Event`: `{1}`, linked to Relationship.");
}

#[test]
fn test_display_is_the_code_name() {
    assert_eq!(TrackerErrorCode::E1113.to_string(), "E1113");
}

#[test]
fn test_code_serializes_as_name() {
    let json: String = serde_json::to_string(&TrackerErrorCode::E4015).unwrap();
    assert_eq!(json, "\"E4015\"");
}
