// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Copy Handler (§4.5): OPEN → DECIDE → SINGLE_SHOT|RESUMABLE → FINALIZE.

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use tokio::io::AsyncSeekExt;

use ta_adapters::{ObjectStoreAdapter, ObjectStoreError};
use ta_core::{apply_prefix, strip_prefix_once, CopyLog, CopySpec, FailureType, TaskLog, TaskResponse, TaskSpec};

use crate::backoff::Backoff;
use crate::rate_admission::RateAdmission;
use crate::reader_pipeline::{build_pipeline, ChunkSource};
use crate::stats::Stats;

/// In-handler retries beyond the built-in client retries (§4.5).
const MAX_RETRY_COUNT: u32 = 1;
const READ_BUF_SIZE: usize = 64 * 1024;

pub struct CopyHandler {
    store: Arc<dyn ObjectStoreAdapter>,
    admission: RateAdmission,
    stats: Stats,
    chunk_size: u64,
    mount_directory: String,
}

impl CopyHandler {
    pub fn new(
        store: Arc<dyn ObjectStoreAdapter>,
        admission: RateAdmission,
        stats: Stats,
        chunk_size: u64,
        mount_directory: String,
    ) -> Self {
        Self {
            store,
            admission,
            stats,
            chunk_size,
            mount_directory,
        }
    }

    pub async fn handle(&self, spec: CopySpec) -> TaskResponse {
        let req_spec = TaskSpec::Copy(spec.clone());

        if let Err(e) = spec.validate() {
            return TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None);
        }

        let resolved_path = apply_prefix(&self.mount_directory, &spec.src_file);

        let metadata = match tokio::fs::metadata(&resolved_path).await {
            Ok(m) => m,
            Err(e) => return self.stat_failure(req_spec, &resolved_path, e),
        };
        let size = metadata.len();
        let mtime = mtime_unix_secs(&metadata);

        if spec.resumable_upload_id.is_empty() && size <= self.chunk_size {
            self.single_shot(req_spec, spec, &resolved_path, size).await
        } else {
            self.resumable(req_spec, spec, &resolved_path, size, mtime).await
        }
    }

    fn stat_failure(&self, req_spec: TaskSpec, resolved_path: &str, err: io::Error) -> TaskResponse {
        let message = strip_prefix_once(&self.mount_directory, resolved_path);
        match err.kind() {
            io::ErrorKind::NotFound => {
                TaskResponse::failure(req_spec, FailureType::FileNotFoundFailure, message, None)
            }
            io::ErrorKind::PermissionDenied => {
                TaskResponse::failure(req_spec, FailureType::PermissionFailure, message, None)
            }
            _ => TaskResponse::failure(req_spec, FailureType::Unknown, err.to_string(), None),
        }
    }

    async fn single_shot(&self, req_spec: TaskSpec, spec: CopySpec, path: &str, size: u64) -> TaskResponse {
        let file = match tokio::fs::File::open(path).await {
            Ok(f) => f,
            Err(e) => return self.stat_failure(req_spec, path, e),
        };

        let checksum = Arc::new(AtomicU32::new(0));
        let mut source = build_pipeline(file, Arc::clone(&checksum), &self.admission);

        let mut data = Vec::with_capacity(size as usize);
        let mut buf = vec![0u8; READ_BUF_SIZE];
        loop {
            match source.read_chunk(&mut buf).await {
                Ok(0) => break,
                Ok(n) => data.extend_from_slice(&buf[..n]),
                Err(e) => return TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None),
            }
        }

        self.stats.record_bytes_copied(data.len() as u64);
        let local_crc = checksum.load(Ordering::Relaxed);

        match self
            .store
            .write_object(&spec.dst_bucket, &spec.dst_object, data, spec.precondition())
            .await
        {
            Ok(meta) if meta.crc32_c == local_crc => TaskResponse::success(
                req_spec,
                TaskLog::Copy(CopyLog {
                    bytes_copied: meta.size,
                    crc32_c: local_crc,
                    dst_generation: meta.generation,
                }),
                None,
            ),
            Ok(_) => TaskResponse::failure(
                req_spec,
                FailureType::Md5MismatchFailure,
                "crc32c mismatch between local read and server-reported checksum",
                None,
            ),
            Err(ObjectStoreError::PreconditionFailed { .. }) => {
                TaskResponse::failure(req_spec, FailureType::PreconditionFailure, "generation precondition rejected", None)
            }
            Err(e) => TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None),
        }
    }

    async fn resumable(
        &self,
        req_spec: TaskSpec,
        mut spec: CopySpec,
        path: &str,
        size: u64,
        mtime: i64,
    ) -> TaskResponse {
        if spec.resumable_upload_id.is_empty() {
            match self
                .store
                .start_resumable_session(&spec.dst_bucket, &spec.dst_object, size, spec.precondition())
                .await
            {
                Ok(session) => spec.resumable_upload_id = session.upload_id,
                Err(ObjectStoreError::PreconditionFailed { .. }) => {
                    return TaskResponse::failure(req_spec, FailureType::PreconditionFailure, "generation precondition rejected", None);
                }
                Err(e) => return TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None),
            }
        }

        let mut file = match tokio::fs::File::open(path).await {
            Ok(f) => f,
            Err(e) => return self.stat_failure(req_spec, path, e),
        };
        if let Err(e) = file.seek(io::SeekFrom::Start(spec.bytes_copied)).await {
            return TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None);
        }

        let checksum = Arc::new(AtomicU32::new(spec.crc32_c));
        let mut source = build_pipeline(file, Arc::clone(&checksum), &self.admission);

        let mut backoff = Backoff::new();
        let mut retries = 0u32;

        while spec.bytes_copied < size {
            let this_chunk = (size - spec.bytes_copied).min(self.chunk_size) as usize;
            let mut buf = vec![0u8; this_chunk];
            let n = match read_exact_or_eof(&mut source, &mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    if let Some(resp) = self
                        .retry_or_fail(&mut backoff, &mut retries, req_spec.clone(), &spec, e.to_string())
                        .await
                    {
                        return resp;
                    }
                    continue;
                }
            };

            match tokio::fs::metadata(path).await {
                Ok(current) if current.len() == size && mtime_unix_secs(&current) == mtime => {}
                Ok(_) => {
                    return TaskResponse::failure(req_spec, FailureType::FileModifiedFailure, "source file changed mid-copy", None);
                }
                Err(e) => return TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None),
            }

            let is_final = spec.bytes_copied + n as u64 >= size;
            match self
                .store
                .write_chunk(&spec.resumable_upload_id, spec.bytes_copied, buf[..n].to_vec(), is_final)
                .await
            {
                Ok(final_meta) => {
                    spec.bytes_copied += n as u64;
                    spec.crc32_c = checksum.load(Ordering::Relaxed);
                    self.stats.record_bytes_copied(n as u64);
                    backoff = Backoff::new();
                    retries = 0;

                    if let Some(meta) = final_meta {
                        if meta.crc32_c != spec.crc32_c {
                            return TaskResponse::failure(req_spec, FailureType::Md5MismatchFailure, "crc32c mismatch after upload", None);
                        }
                        return TaskResponse::success(
                            req_spec,
                            TaskLog::Copy(CopyLog {
                                bytes_copied: spec.bytes_copied,
                                crc32_c: spec.crc32_c,
                                dst_generation: meta.generation,
                            }),
                            None,
                        );
                    }
                }
                Err(ObjectStoreError::PreconditionFailed { .. }) => {
                    return TaskResponse::failure(req_spec, FailureType::PreconditionFailure, "generation precondition rejected", None);
                }
                Err(e) => {
                    if let Some(resp) = self
                        .retry_or_fail(&mut backoff, &mut retries, req_spec.clone(), &spec, e.to_string())
                        .await
                    {
                        return resp;
                    }
                }
            }
        }

        // size == 0: nothing was ever written; finalize with an empty chunk.
        match self.store.write_chunk(&spec.resumable_upload_id, 0, Vec::new(), true).await {
            Ok(Some(meta)) => TaskResponse::success(
                req_spec,
                TaskLog::Copy(CopyLog {
                    bytes_copied: 0,
                    crc32_c: checksum.load(Ordering::Relaxed),
                    dst_generation: meta.generation,
                }),
                None,
            ),
            Ok(None) => TaskResponse::failure(req_spec, FailureType::Unknown, "resumable session did not finalize an empty object", None),
            Err(e) => TaskResponse::failure(req_spec, FailureType::Unknown, e.to_string(), None),
        }
    }

    /// Sleeps for the next backoff delay and returns `None` to retry, or
    /// `Some(response)` once the retry budget (§4.5: `MaxRetryCount=1`) or
    /// the backoff's own cutoff is exhausted.
    async fn retry_or_fail(
        &self,
        backoff: &mut Backoff,
        retries: &mut u32,
        req_spec: TaskSpec,
        spec: &CopySpec,
        message: String,
    ) -> Option<TaskResponse> {
        let (delay, should_retry) = backoff.next();
        if should_retry && *retries < MAX_RETRY_COUNT {
            *retries += 1;
            tokio::time::sleep(delay).await;
            None
        } else {
            Some(TaskResponse::failure(
                req_spec,
                FailureType::Unknown,
                message,
                Some(TaskSpec::Copy(spec.clone())),
            ))
        }
    }
}

/// Reads until `buf` is full or the source reaches EOF, since the
/// rate-limiting stage may return fewer bytes than requested per call.
async fn read_exact_or_eof<S: ChunkSource>(source: &mut S, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read_chunk(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn mtime_unix_secs(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "copy_tests.rs"]
mod tests;
