// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ListSpec` / `ListLog`: the data half of the directory-listing task.

use serde::{Deserialize, Serialize};

use crate::copy::GenerationPrecondition;

/// A directory-listing work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSpec {
    pub dst_list_result_bucket: String,
    pub dst_list_result_object: String,
    pub src_directories: Vec<String>,
    pub expected_generation_num: u64,
    pub max_depth: u32,
}

impl ListSpec {
    pub fn precondition(&self) -> GenerationPrecondition {
        if self.expected_generation_num == 0 {
            GenerationPrecondition::DoesNotExist
        } else {
            GenerationPrecondition::MatchesGeneration(self.expected_generation_num)
        }
    }
}

/// One record of the listing artifact body (everything after the first
/// `taskFullID` line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListEntry {
    File {
        rel_path: String,
        size: u64,
        mtime: i64,
    },
    Dir {
        rel_path: String,
    },
    /// An unreadable subdirectory: traversal continues but the failure is
    /// recorded in place of a normal `Dir` entry.
    DirError {
        rel_path: String,
        message: String,
    },
}

impl ListEntry {
    /// Path used for sort order and for binary-search insertion into the
    /// directory store.
    pub fn sort_key(&self) -> &str {
        match self {
            ListEntry::File { rel_path, .. } => rel_path,
            ListEntry::Dir { rel_path } => rel_path,
            ListEntry::DirError { rel_path, .. } => rel_path,
        }
    }
}

/// Outcome log attached to a `TaskResponse` for a list task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLog {
    pub dirs_seen: u64,
    pub dirs_failed: u64,
    pub files_seen: u64,
    pub bytes_found: u64,
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
