// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ObjectStoreAdapter`: the cloud object-store surface the copy, list, and
//! delete handlers drive. Concrete adapters live outside this crate (GCS,
//! S3, ...); this module only defines the trait and the errors every
//! implementation must map onto.

use async_trait::async_trait;
use thiserror::Error;

use ta_core::GenerationPrecondition;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("precondition failed: object at {bucket}/{object} did not match the expected generation")]
    PreconditionFailed { bucket: String, object: String },

    #[error("object not found: {bucket}/{object}")]
    NotFound { bucket: String, object: String },

    #[error("resumable session {0} not found or expired")]
    SessionNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// A finalized write's server-assigned state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub generation: u64,
    pub size: u64,
    pub crc32_c: u32,
}

/// Handle to an in-progress resumable upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumableSession {
    pub upload_id: String,
    /// Bytes the server has actually committed; may be behind what the
    /// caller believes it sent if a prior chunk write was interrupted.
    pub committed_bytes: u64,
}

/// Cloud object storage, as seen by the copy/list/delete handlers.
///
/// Implementations must treat `GenerationPrecondition` as atomic: a write
/// either applies exactly when the precondition holds, or is rejected with
/// [`ObjectStoreError::PreconditionFailed`] — no partial application.
#[async_trait]
pub trait ObjectStoreAdapter: Send + Sync {
    /// Upload the full object body in one request (small-file fast path).
    async fn write_object(
        &self,
        bucket: &str,
        object: &str,
        data: Vec<u8>,
        precondition: GenerationPrecondition,
    ) -> Result<ObjectMetadata, ObjectStoreError>;

    /// Start a resumable session for a large upload.
    async fn start_resumable_session(
        &self,
        bucket: &str,
        object: &str,
        total_size: u64,
        precondition: GenerationPrecondition,
    ) -> Result<ResumableSession, ObjectStoreError>;

    /// Query how many bytes the server has actually committed for a
    /// resumable session, used to resume after a crash or redelivery.
    async fn query_resumable_session(
        &self,
        upload_id: &str,
    ) -> Result<ResumableSession, ObjectStoreError>;

    /// Upload one chunk at `offset`. `final_chunk` finalizes the object.
    async fn write_chunk(
        &self,
        upload_id: &str,
        offset: u64,
        data: Vec<u8>,
        final_chunk: bool,
    ) -> Result<Option<ObjectMetadata>, ObjectStoreError>;

    /// Delete an object, optionally gated on a generation precondition.
    async fn delete_object(
        &self,
        bucket: &str,
        object: &str,
        precondition: Option<GenerationPrecondition>,
    ) -> Result<(), ObjectStoreError>;
}

#[cfg(test)]
#[path = "object_store_tests.rs"]
mod tests;
