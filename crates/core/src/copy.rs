// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `CopySpec` / `CopyLog`: the data half of the copy state machine.
//!
//! The behavior lives in `ta-engine::handlers::copy`; this module only
//! carries the spec's invariants so callers don't need the handler in scope
//! just to validate a spec.

use serde::{Deserialize, Serialize};

/// A file-copy work order.
///
/// A *fresh* copy has `bytes_copied == 0` and an empty `resumable_upload_id`.
/// A *resumed* copy carries a non-empty `resumable_upload_id` from a prior
/// (possibly different) agent's attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopySpec {
    pub src_file: String,
    pub dst_bucket: String,
    pub dst_object: String,
    /// 0 means "object must not already exist"; otherwise a strict
    /// generation match precondition.
    pub expected_generation_num: u64,
    /// Size of the source file as last observed. Only meaningful once
    /// populated by a prior attempt (fresh specs leave it at 0).
    pub file_bytes: u64,
    /// mtime (unix seconds) of the source file as last observed.
    pub file_mtime: i64,
    /// Bytes already uploaded in a prior attempt.
    pub bytes_copied: u64,
    /// Running CRC32C of the bytes uploaded so far.
    pub crc32_c: u32,
    /// Chunk size to use for resumable uploads.
    pub bytes_to_copy: u64,
    /// Opaque resumable session id. Empty for a fresh copy.
    pub resumable_upload_id: String,
}

/// Why a [`CopySpec`] failed precondition validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CopySpecError {
    #[error("srcFile must not be empty")]
    MissingSrcFile,
    #[error("dstBucket must not be empty")]
    MissingDstBucket,
    #[error("dstObject must not be empty")]
    MissingDstObject,
    #[error("resumed copy requires a non-empty resumableUploadId")]
    MissingResumableUploadId,
}

impl CopySpec {
    /// True when this spec describes a copy that has never uploaded any
    /// bytes (§3: `bytesCopied=0 ∧ resumableUploadId=""`).
    pub fn is_fresh(&self) -> bool {
        self.bytes_copied == 0 && self.resumable_upload_id.is_empty()
    }

    /// Validate the preconditions from spec §4.5 before any I/O happens.
    pub fn validate(&self) -> Result<(), CopySpecError> {
        if self.src_file.is_empty() {
            return Err(CopySpecError::MissingSrcFile);
        }
        if self.dst_bucket.is_empty() {
            return Err(CopySpecError::MissingDstBucket);
        }
        if self.dst_object.is_empty() {
            return Err(CopySpecError::MissingDstObject);
        }
        if !self.is_fresh() && self.resumable_upload_id.is_empty() {
            return Err(CopySpecError::MissingResumableUploadId);
        }
        Ok(())
    }

    /// Object-store precondition implied by `expected_generation_num`.
    pub fn precondition(&self) -> GenerationPrecondition {
        if self.expected_generation_num == 0 {
            GenerationPrecondition::DoesNotExist
        } else {
            GenerationPrecondition::MatchesGeneration(self.expected_generation_num)
        }
    }
}

/// Write precondition applied to an object store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPrecondition {
    DoesNotExist,
    MatchesGeneration(u64),
}

/// Outcome log attached to a successful or failed copy `TaskResponse`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyLog {
    pub bytes_copied: u64,
    pub crc32_c: u32,
    pub dst_generation: u64,
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
