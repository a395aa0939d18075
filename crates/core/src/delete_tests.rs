// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::DeleteSpec;
use crate::copy::GenerationPrecondition;

#[test]
fn zero_generation_has_no_precondition() {
    let spec = DeleteSpec {
        bucket: "b".into(),
        object: "o".into(),
        expected_generation_num: 0,
    };
    assert_eq!(spec.precondition(), None);
}

#[test]
fn nonzero_generation_is_a_strict_match() {
    let spec = DeleteSpec {
        bucket: "b".into(),
        object: "o".into(),
        expected_generation_num: 5,
    };
    assert_eq!(
        spec.precondition(),
        Some(GenerationPrecondition::MatchesGeneration(5))
    );
}
