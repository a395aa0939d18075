// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake object store for deterministic testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use ta_core::GenerationPrecondition;

use crate::object_store::{ObjectMetadata, ObjectStoreAdapter, ObjectStoreError, ResumableSession};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub generation: u64,
    pub crc32_c: u32,
}

struct PendingUpload {
    bucket: String,
    object: String,
    precondition: GenerationPrecondition,
    buffer: Vec<u8>,
}

#[derive(Clone)]
pub struct FakeObjectStore {
    inner: Arc<Mutex<FakeObjectStoreState>>,
}

struct FakeObjectStoreState {
    objects: HashMap<(String, String), StoredObject>,
    uploads: HashMap<String, PendingUpload>,
    next_generation: u64,
    next_upload_id: u64,
}

impl Default for FakeObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeObjectStoreState {
                objects: HashMap::new(),
                uploads: HashMap::new(),
                next_generation: 1,
                next_upload_id: 1,
            })),
        }
    }

    pub fn get(&self, bucket: &str, object: &str) -> Option<StoredObject> {
        self.inner
            .lock()
            .objects
            .get(&(bucket.to_string(), object.to_string()))
            .cloned()
    }

    pub fn seed(&self, bucket: &str, object: &str, data: Vec<u8>, generation: u64) {
        let crc32_c = crc32c::crc32c(&data);
        self.inner.lock().objects.insert(
            (bucket.to_string(), object.to_string()),
            StoredObject {
                data,
                generation,
                crc32_c,
            },
        );
    }
}

fn check_precondition(
    existing: Option<&StoredObject>,
    precondition: GenerationPrecondition,
    bucket: &str,
    object: &str,
) -> Result<(), ObjectStoreError> {
    let ok = match precondition {
        GenerationPrecondition::DoesNotExist => existing.is_none(),
        GenerationPrecondition::MatchesGeneration(expected) => {
            existing.map(|o| o.generation) == Some(expected)
        }
    };
    if ok {
        Ok(())
    } else {
        Err(ObjectStoreError::PreconditionFailed {
            bucket: bucket.to_string(),
            object: object.to_string(),
        })
    }
}

#[async_trait]
impl ObjectStoreAdapter for FakeObjectStore {
    async fn write_object(
        &self,
        bucket: &str,
        object: &str,
        data: Vec<u8>,
        precondition: GenerationPrecondition,
    ) -> Result<ObjectMetadata, ObjectStoreError> {
        let mut state = self.inner.lock();
        let key = (bucket.to_string(), object.to_string());
        check_precondition(state.objects.get(&key), precondition, bucket, object)?;
        let generation = state.next_generation;
        state.next_generation += 1;
        let crc32_c = crc32c::crc32c(&data);
        let size = data.len() as u64;
        state.objects.insert(
            key,
            StoredObject {
                data,
                generation,
                crc32_c,
            },
        );
        Ok(ObjectMetadata {
            generation,
            size,
            crc32_c,
        })
    }

    async fn start_resumable_session(
        &self,
        bucket: &str,
        object: &str,
        total_size: u64,
        precondition: GenerationPrecondition,
    ) -> Result<ResumableSession, ObjectStoreError> {
        let mut state = self.inner.lock();
        let key = (bucket.to_string(), object.to_string());
        check_precondition(state.objects.get(&key), precondition, bucket, object)?;
        let upload_id = format!("upload-{}", state.next_upload_id);
        state.next_upload_id += 1;
        state.uploads.insert(
            upload_id.clone(),
            PendingUpload {
                bucket: bucket.to_string(),
                object: object.to_string(),
                precondition,
                buffer: Vec::with_capacity(total_size as usize),
            },
        );
        Ok(ResumableSession {
            upload_id,
            committed_bytes: 0,
        })
    }

    async fn query_resumable_session(
        &self,
        upload_id: &str,
    ) -> Result<ResumableSession, ObjectStoreError> {
        let state = self.inner.lock();
        let upload = state
            .uploads
            .get(upload_id)
            .ok_or_else(|| ObjectStoreError::SessionNotFound(upload_id.to_string()))?;
        Ok(ResumableSession {
            upload_id: upload_id.to_string(),
            committed_bytes: upload.buffer.len() as u64,
        })
    }

    async fn write_chunk(
        &self,
        upload_id: &str,
        offset: u64,
        data: Vec<u8>,
        final_chunk: bool,
    ) -> Result<Option<ObjectMetadata>, ObjectStoreError> {
        let mut state = self.inner.lock();
        let upload = state
            .uploads
            .get_mut(upload_id)
            .ok_or_else(|| ObjectStoreError::SessionNotFound(upload_id.to_string()))?;
        if offset as usize != upload.buffer.len() {
            return Err(ObjectStoreError::Transport(format!(
                "chunk offset {offset} does not match committed length {}",
                upload.buffer.len()
            )));
        }
        upload.buffer.extend_from_slice(&data);

        if !final_chunk {
            return Ok(None);
        }

        let upload = state.uploads.remove(upload_id).expect("checked above");
        let key = (upload.bucket.clone(), upload.object.clone());
        check_precondition(
            state.objects.get(&key),
            upload.precondition,
            &upload.bucket,
            &upload.object,
        )?;
        let generation = state.next_generation;
        state.next_generation += 1;
        let crc32_c = crc32c::crc32c(&upload.buffer);
        let size = upload.buffer.len() as u64;
        state.objects.insert(
            key,
            StoredObject {
                data: upload.buffer,
                generation,
                crc32_c,
            },
        );
        Ok(Some(ObjectMetadata {
            generation,
            size,
            crc32_c,
        }))
    }

    async fn delete_object(
        &self,
        bucket: &str,
        object: &str,
        precondition: Option<GenerationPrecondition>,
    ) -> Result<(), ObjectStoreError> {
        let mut state = self.inner.lock();
        let key = (bucket.to_string(), object.to_string());
        if let Some(precondition) = precondition {
            check_precondition(state.objects.get(&key), precondition, bucket, object)?;
        }
        state
            .objects
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| ObjectStoreError::NotFound {
                bucket: bucket.to_string(),
                object: object.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "object_store_tests.rs"]
mod tests;
