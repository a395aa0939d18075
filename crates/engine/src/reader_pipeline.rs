// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reader Pipeline (§4.3): a composable byte-source chain wrapping a file
//! reader with, from innermost to outermost, a CRC32C-updating stage, a
//! sem-acquiring stage, and a rate-limiting stage.

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;

use crate::rate_admission::RateAdmission;

/// A byte source a copy task reads from. Implemented for `tokio::fs::File`
/// directly; the three wrappers below compose over any `ChunkSource`.
#[async_trait]
pub trait ChunkSource: Send {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

#[async_trait]
impl ChunkSource for tokio::fs::File {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf).await
    }
}

/// Innermost stage: updates an externally owned CRC32C accumulator on every
/// successful read. Errors propagate with the checksum left untouched.
pub struct Crc32cSource<S> {
    inner: S,
    checksum: Arc<AtomicU32>,
}

impl<S: ChunkSource> Crc32cSource<S> {
    pub fn new(inner: S, checksum: Arc<AtomicU32>) -> Self {
        Self { inner, checksum }
    }
}

#[async_trait]
impl<S: ChunkSource> ChunkSource for Crc32cSource<S> {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read_chunk(buf).await?;
        if n > 0 {
            let prev = self.checksum.load(Ordering::Relaxed);
            let next = crc32c::crc32c_append(prev, &buf[..n]);
            self.checksum.store(next, Ordering::Relaxed);
        }
        Ok(n)
    }
}

/// Middle stage: acquires one read-concurrency permit per read and releases
/// it when the read completes. Elided (identity) when `permits` is `None`,
/// matching the `concurrentReadMax < 0` case.
pub struct SemGatedSource<S> {
    inner: S,
    permits: Option<Arc<Semaphore>>,
}

impl<S: ChunkSource> SemGatedSource<S> {
    pub fn new(inner: S, permits: Option<Arc<Semaphore>>) -> Self {
        Self { inner, permits }
    }
}

#[async_trait]
impl<S: ChunkSource> ChunkSource for SemGatedSource<S> {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &self.permits {
            None => self.inner.read_chunk(buf).await,
            Some(sem) => {
                let _permit = sem.acquire().await.map_err(|e| {
                    io::Error::new(io::ErrorKind::Other, format!("semaphore closed: {e}"))
                })?;
                self.inner.read_chunk(buf).await
            }
        }
    }
}

/// Outermost stage: clamps the caller's buffer to the current limiter rate
/// before reading, then reserves tokens for the bytes actually read and
/// sleeps for the returned delay.
pub struct RateLimitedSource<S> {
    inner: S,
    admission: RateAdmission,
}

impl<S: ChunkSource> RateLimitedSource<S> {
    pub fn new(inner: S, admission: RateAdmission) -> Self {
        Self { inner, admission }
    }
}

#[async_trait]
impl<S: ChunkSource> ChunkSource for RateLimitedSource<S> {
    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let clamped = self.admission.clamp_buffer_len(buf.len());
        if clamped == 0 && !buf.is_empty() {
            // A configured rate of exactly 0 must block every read forever;
            // the only way out is the caller being cancelled around us.
            return std::future::pending().await;
        }
        let n = self.inner.read_chunk(&mut buf[..clamped]).await?;
        if n > 0 {
            self.admission.record_bytes_on_wire(n as u64);
            let delay = self.admission.reserve_delay(n as u32);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(n)
    }
}

/// Build the full §4.3 chain over `file`: CRC32C innermost, then the
/// sem-acquiring stage (elided when `admission` is unbounded), then the
/// rate-limiting stage outermost.
pub fn build_pipeline(
    file: tokio::fs::File,
    checksum: Arc<AtomicU32>,
    admission: &RateAdmission,
) -> RateLimitedSource<SemGatedSource<Crc32cSource<tokio::fs::File>>> {
    let crc = Crc32cSource::new(file, checksum);
    let gated = SemGatedSource::new(crc, admission.read_permits());
    RateLimitedSource::new(gated, admission.clone())
}

#[cfg(test)]
#[path = "reader_pipeline_tests.rs"]
mod tests;
