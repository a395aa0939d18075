// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn precondition_failed_display_names_bucket_and_object() {
    let err = ObjectStoreError::PreconditionFailed {
        bucket: "b".into(),
        object: "o".into(),
    };
    assert!(err.to_string().contains("b/o"));
}
