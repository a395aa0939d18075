// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{ListEntry, ListSpec};
use crate::copy::GenerationPrecondition;

fn spec(gen: u64) -> ListSpec {
    ListSpec {
        dst_list_result_bucket: "b".into(),
        dst_list_result_object: "listing.txt".into(),
        src_directories: vec!["/data".into()],
        expected_generation_num: gen,
        max_depth: 10,
    }
}

#[test]
fn zero_generation_means_must_not_exist() {
    assert_eq!(spec(0).precondition(), GenerationPrecondition::DoesNotExist);
}

#[test]
fn nonzero_generation_is_a_strict_match() {
    assert_eq!(
        spec(7).precondition(),
        GenerationPrecondition::MatchesGeneration(7)
    );
}

#[test]
fn sort_key_reflects_entry_path() {
    let file = ListEntry::File {
        rel_path: "a/b.txt".into(),
        size: 10,
        mtime: 0,
    };
    let dir = ListEntry::Dir {
        rel_path: "a".into(),
    };
    let dir_err = ListEntry::DirError {
        rel_path: "a/locked".into(),
        message: "permission denied".into(),
    };
    assert_eq!(file.sort_key(), "a/b.txt");
    assert_eq!(dir.sort_key(), "a");
    assert_eq!(dir_err.sort_key(), "a/locked");
}
