// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task failure taxonomy.
//!
//! These are the values that appear in `TaskResponse::failure_type`. The
//! naming is deliberately legacy in one case (`Md5Mismatch` actually reports
//! a CRC32C mismatch) to match the wire field the control plane already
//! consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed failure reported in a [`crate::task::TaskResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureType {
    /// Fallback for errors that don't fit a more specific bucket. Retryable.
    Unknown,
    /// Source file's mtime or size changed mid-copy. Non-retryable; the
    /// control plane re-plans the task with fresh spec data.
    FileModifiedFailure,
    /// Post-upload CRC32C didn't match the server-reported checksum.
    /// Legacy name: the check has always been CRC32C, never MD5.
    Md5MismatchFailure,
    /// Object generation precondition was rejected by the store.
    PreconditionFailure,
    /// Source file does not exist.
    FileNotFoundFailure,
    /// A source directory named in a `ListSpec` does not exist.
    SourceDirNotFound,
    /// Local I/O permission was denied.
    PermissionFailure,
    /// Job run's bandwidth was zero at dispatch time (synthesized, handler
    /// never invoked).
    NotActiveJobrun,
}

impl FailureType {
    /// Whether the handler may retry this failure locally (with backoff)
    /// before surfacing it, vs. short-circuiting immediately.
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            FailureType::PermissionFailure
                | FailureType::FileNotFoundFailure
                | FailureType::SourceDirNotFound
                | FailureType::PreconditionFailure
                | FailureType::FileModifiedFailure
        )
    }
}

impl FailureType {
    /// Inverse of [`fmt::Display`], for decoding the legacy string carried
    /// on the wire. Unrecognized strings map to `Unknown` rather than
    /// failing decode, matching the spec's "unknown fields tolerated"
    /// forward-compatibility requirement.
    pub fn from_legacy_str(s: &str) -> Self {
        match s {
            "FILE_MODIFIED_FAILURE" => FailureType::FileModifiedFailure,
            "MD5_MISMATCH_FAILURE" => FailureType::Md5MismatchFailure,
            "PRECONDITION_FAILURE" => FailureType::PreconditionFailure,
            "FILE_NOT_FOUND_FAILURE" => FailureType::FileNotFoundFailure,
            "SOURCE_DIR_NOT_FOUND" => FailureType::SourceDirNotFound,
            "PERMISSION_FAILURE" => FailureType::PermissionFailure,
            "NOT_ACTIVE_JOBRUN" => FailureType::NotActiveJobrun,
            _ => FailureType::Unknown,
        }
    }
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureType::Unknown => "UNKNOWN",
            FailureType::FileModifiedFailure => "FILE_MODIFIED_FAILURE",
            FailureType::Md5MismatchFailure => "MD5_MISMATCH_FAILURE",
            FailureType::PreconditionFailure => "PRECONDITION_FAILURE",
            FailureType::FileNotFoundFailure => "FILE_NOT_FOUND_FAILURE",
            FailureType::SourceDirNotFound => "SOURCE_DIR_NOT_FOUND",
            FailureType::PermissionFailure => "PERMISSION_FAILURE",
            FailureType::NotActiveJobrun => "NOT_ACTIVE_JOBRUN",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
