// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use ta_core::TaskKind;

use super::*;

#[tokio::test]
async fn accumulated_bytes_copied_never_resets_across_ring_advances() {
    let stats = Stats::spawn();
    stats.record_bytes_copied(1024);
    // let the drain task observe the send
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(stats.accumulated_bytes_copied(), 1024);
    stats.record_bytes_copied(512);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(stats.accumulated_bytes_copied(), 1536);
}

#[tokio::test]
async fn current_throughput_reflects_recent_bytes() {
    let stats = Stats::spawn();
    stats.record_bytes_copied(2048);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(stats.current_throughput(), 2048);
}

#[tokio::test]
async fn current_bandwidth_reflects_bytes_observed_on_the_wire() {
    let stats = Stats::spawn();
    stats.record_bytes_on_wire(2048);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(stats.current_bandwidth(), 2048);
}

#[tokio::test]
async fn current_bandwidth_is_independent_of_handler_level_throughput() {
    let stats = Stats::spawn();
    stats.record_bytes_copied(4096);
    stats.record_bytes_on_wire(1024);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(stats.current_throughput(), 4096);
    assert_eq!(stats.current_bandwidth(), 1024);
}

#[test]
fn duration_samples_track_min_max_avg() {
    let mut samples = DurationSamples::default();
    samples.record(Duration::from_millis(10));
    samples.record(Duration::from_millis(30));
    samples.record(Duration::from_millis(20));
    assert_eq!(samples.count, 3);
    assert_eq!(samples.min, Duration::from_millis(10));
    assert_eq!(samples.max, Duration::from_millis(30));
    assert_eq!(samples.avg(), Duration::from_millis(20));
}

#[test]
fn ring_buffer_sum_only_counts_retained_slots() {
    let mut ring = RingBuffer::default();
    for _ in 0..RING_SLOTS {
        ring.add(10);
        ring.advance();
    }
    // every slot was reset to zero on its own advance, so only the most
    // recent in-progress slot (empty) contributes.
    assert_eq!(ring.sum(), 0);
}

#[test]
fn pulse_and_control_counters_increment_independently() {
    let stats_state = StatsState::default();
    let state = std::sync::Arc::new(Mutex::new(stats_state));
    let (tx, _rx) = mpsc::channel(1);
    let (wire_tx, _wire_rx) = mpsc::channel(1);
    let stats = Stats {
        state,
        bytes_sent_tx: tx,
        bytes_on_wire_tx: wire_tx,
    };
    stats.record_pulse();
    stats.record_pulse();
    assert_eq!(stats.pulse_count(), 2);

    stats.record_control_message(std::time::SystemTime::UNIX_EPOCH);
    assert_eq!(stats.ctrl_msg_count(), 1);
    assert_eq!(
        stats.last_ctrl_publish_time(),
        Some(std::time::SystemTime::UNIX_EPOCH)
    );
}

#[test]
fn record_task_duration_is_keyed_per_task_kind() {
    let stats_state = StatsState::default();
    let state = std::sync::Arc::new(Mutex::new(stats_state));
    let (tx, _rx) = mpsc::channel(1);
    let (wire_tx, _wire_rx) = mpsc::channel(1);
    let stats = Stats {
        state: state.clone(),
        bytes_sent_tx: tx,
        bytes_on_wire_tx: wire_tx,
    };
    stats.record_task_duration(TaskKind::Copy, Duration::from_millis(5));
    stats.record_task_duration(TaskKind::List, Duration::from_millis(7));
    let guard = state.lock();
    assert_eq!(guard.durations.get(&TaskKind::Copy).unwrap().count, 1);
    assert_eq!(guard.durations.get(&TaskKind::List).unwrap().count, 1);
}
