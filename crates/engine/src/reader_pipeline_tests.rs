// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write as _;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::*;
use crate::stats::Stats;

async fn temp_file_with(data: &[u8]) -> tokio::fs::File {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(data).expect("write temp data");
    tokio::fs::File::open(file.path()).await.expect("reopen temp file")
}

#[tokio::test]
async fn crc32c_source_matches_whole_buffer_checksum() {
    let data = b"the quick brown fox jumps over the lazy dog";
    let file = temp_file_with(data).await;
    let checksum = Arc::new(AtomicU32::new(0));
    let mut source = Crc32cSource::new(file, Arc::clone(&checksum));

    let mut buf = vec![0u8; data.len()];
    let n = source.read_chunk(&mut buf).await.unwrap();
    assert_eq!(n, data.len());
    assert_eq!(checksum.load(Ordering::Relaxed), crc32c::crc32c(data));
}

#[tokio::test]
async fn sem_gated_source_is_identity_when_unbounded() {
    let data = b"payload";
    let file = temp_file_with(data).await;
    let checksum = Arc::new(AtomicU32::new(0));
    let crc = Crc32cSource::new(file, checksum);
    let mut gated = SemGatedSource::new(crc, None);

    let mut buf = vec![0u8; data.len()];
    let n = gated.read_chunk(&mut buf).await.unwrap();
    assert_eq!(n, data.len());
}

#[tokio::test]
async fn sem_gated_source_serializes_through_a_bounded_semaphore() {
    let data = b"payload";
    let file = temp_file_with(data).await;
    let checksum = Arc::new(AtomicU32::new(0));
    let crc = Crc32cSource::new(file, checksum);
    let sem = Arc::new(Semaphore::new(1));
    let mut gated = SemGatedSource::new(crc, Some(sem));

    let mut buf = vec![0u8; data.len()];
    let n = gated.read_chunk(&mut buf).await.unwrap();
    assert_eq!(n, data.len());
}

#[tokio::test]
async fn rate_limited_source_clamps_buffer_to_the_configured_rate() {
    let data = vec![7u8; 64];
    let file = temp_file_with(&data).await;
    let checksum = Arc::new(AtomicU32::new(0));
    let admission = RateAdmission::new(-1, Stats::spawn());
    admission.apply_control(&ta_core::ControlMessage {
        job_runs_bandwidths: [("job-a".to_string(), 8)].into_iter().collect(),
        agent_update_sources: Vec::new(),
        publish_time: std::time::SystemTime::UNIX_EPOCH,
    });

    let pipeline = build_pipeline(file, checksum, &admission);
    let mut source = pipeline;
    let mut buf = vec![0u8; 64];
    let n = source.read_chunk(&mut buf).await.unwrap();
    assert!(n <= 8, "expected the read to be clamped to the configured rate, got {n}");
}

#[tokio::test]
async fn rate_limited_source_feeds_stats_bandwidth_not_just_throughput() {
    let data = vec![9u8; 32];
    let file = temp_file_with(&data).await;
    let checksum = Arc::new(AtomicU32::new(0));
    let stats = Stats::spawn();
    let admission = RateAdmission::new(-1, stats.clone());

    let mut source = build_pipeline(file, checksum, &admission);
    let mut buf = vec![0u8; data.len()];
    let n = source.read_chunk(&mut buf).await.unwrap();
    assert_eq!(n, data.len());

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(stats.current_bandwidth(), data.len() as u64);
}

#[tokio::test]
async fn rate_limited_source_blocks_forever_at_a_zero_rate() {
    let data = vec![7u8; 64];
    let file = temp_file_with(&data).await;
    let checksum = Arc::new(AtomicU32::new(0));
    let admission = RateAdmission::new(-1, Stats::spawn());
    admission.apply_control(&ta_core::ControlMessage {
        job_runs_bandwidths: [("job-a".to_string(), 0)].into_iter().collect(),
        agent_update_sources: Vec::new(),
        publish_time: std::time::SystemTime::UNIX_EPOCH,
    });

    let mut source = build_pipeline(file, checksum, &admission);
    let mut buf = vec![0u8; 64];
    let result = tokio::time::timeout(std::time::Duration::from_millis(50), source.read_chunk(&mut buf)).await;
    assert!(result.is_err(), "a rate of 0 must block the read instead of letting any bytes through");
}
