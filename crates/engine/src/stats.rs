// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stats Tracker (§4.2): rolling one-second throughput/bandwidth windows,
//! per-task-type duration samples flushed on a 3-minute tick, and the
//! counters the pulse emitter reads.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use ta_core::TaskKind;

/// Slots in each rolling window (§4.2: `D=10` one-second slots).
const RING_SLOTS: usize = 10;
const TICK_INTERVAL: Duration = Duration::from_secs(1);
const DURATION_FLUSH_INTERVAL: Duration = Duration::from_secs(3 * 60);
/// Capacity of the bytes-sent channel draining the hot read path (§4.2).
const BYTES_SENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Clone, Copy, Default)]
struct RingBuffer {
    slots: [u64; RING_SLOTS],
    cursor: usize,
}

impl RingBuffer {
    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % RING_SLOTS;
        self.slots[self.cursor] = 0;
    }

    fn add(&mut self, n: u64) {
        self.slots[self.cursor] = self.slots[self.cursor].saturating_add(n);
    }

    fn sum(&self) -> u64 {
        self.slots.iter().sum()
    }
}

#[derive(Default)]
struct DurationSamples {
    count: u64,
    min: Duration,
    max: Duration,
    total: Duration,
}

impl DurationSamples {
    fn record(&mut self, d: Duration) {
        if self.count == 0 {
            self.min = d;
            self.max = d;
        } else {
            self.min = self.min.min(d);
            self.max = self.max.max(d);
        }
        self.total += d;
        self.count += 1;
    }

    fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count as u32
        }
    }
}

struct StatsState {
    /// Instantaneous throughput, measured at the handler level
    /// (`record_bytes_copied`).
    throughput: RingBuffer,
    /// Measured bandwidth, fed from the wire-level read stage
    /// (`record_bytes_on_wire`) — distinct from `bandwidth_setting`, which
    /// is the *configured* limit, not an observed rate.
    bandwidth: RingBuffer,
    bandwidth_setting: u64,
    durations: HashMap<TaskKind, DurationSamples>,
    accumulated_bytes_copied: u64,
    pulse_count: u64,
    ctrl_msg_count: u64,
    last_ctrl_publish_time: Option<SystemTime>,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            throughput: RingBuffer::default(),
            bandwidth: RingBuffer::default(),
            bandwidth_setting: 0,
            durations: HashMap::new(),
            accumulated_bytes_copied: 0,
            pulse_count: 0,
            ctrl_msg_count: 0,
            last_ctrl_publish_time: None,
        }
    }
}

/// Process-wide stats tracker. Cheap to clone.
#[derive(Clone)]
pub struct Stats {
    state: Arc<Mutex<StatsState>>,
    bytes_sent_tx: mpsc::Sender<u64>,
    bytes_on_wire_tx: mpsc::Sender<u64>,
}

impl Stats {
    /// Builds the tracker and spawns its two background ticks (the
    /// one-second ring advance and the three-minute duration-summary
    /// flush), plus the hot-path bytes-sent drain task.
    pub fn spawn() -> Self {
        let state = Arc::new(Mutex::new(StatsState::default()));
        let (bytes_sent_tx, mut bytes_sent_rx) = mpsc::channel::<u64>(BYTES_SENT_CHANNEL_CAPACITY);
        let (bytes_on_wire_tx, mut bytes_on_wire_rx) = mpsc::channel::<u64>(BYTES_SENT_CHANNEL_CAPACITY);

        {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(n) = bytes_sent_rx.recv().await {
                    let mut state = state.lock();
                    state.throughput.add(n);
                    state.accumulated_bytes_copied = state.accumulated_bytes_copied.saturating_add(n);
                }
            });
        }

        {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(n) = bytes_on_wire_rx.recv().await {
                    state.lock().bandwidth.add(n);
                }
            });
        }

        {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(TICK_INTERVAL);
                loop {
                    interval.tick().await;
                    let mut state = state.lock();
                    state.throughput.advance();
                    state.bandwidth.advance();
                }
            });
        }

        {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(DURATION_FLUSH_INTERVAL);
                loop {
                    interval.tick().await;
                    flush_durations(&state);
                }
            });
        }

        Self { state, bytes_sent_tx, bytes_on_wire_tx }
    }

    /// Record `n` bytes successfully read off a copy's reader pipeline.
    /// Non-blocking; if the channel is saturated the sample is dropped
    /// rather than stalling the copy handler.
    pub fn record_bytes_copied(&self, n: u64) {
        let _ = self.bytes_sent_tx.try_send(n);
    }

    /// Record `n` bytes observed at the wire-level read stage (the
    /// rate-limiting stage of the reader pipeline, §4.3), distinct from
    /// `record_bytes_copied`'s handler-level view of the same stream.
    /// Non-blocking for the same reason as `record_bytes_copied`.
    pub fn record_bytes_on_wire(&self, n: u64) {
        let _ = self.bytes_on_wire_tx.try_send(n);
    }

    pub fn record_task_duration(&self, kind: TaskKind, duration: Duration) {
        self.state
            .lock()
            .durations
            .entry(kind)
            .or_default()
            .record(duration);
    }

    pub fn record_rate_limit(&self, bytes_per_sec: u64) {
        self.state.lock().bandwidth_setting = bytes_per_sec;
    }

    pub fn record_pulse(&self) {
        self.state.lock().pulse_count += 1;
    }

    pub fn record_control_message(&self, publish_time: SystemTime) {
        let mut state = self.state.lock();
        state.ctrl_msg_count += 1;
        state.last_ctrl_publish_time = Some(publish_time);
    }

    /// Never resets — the pulse emitter reads this every tick (§4.8).
    pub fn accumulated_bytes_copied(&self) -> u64 {
        self.state.lock().accumulated_bytes_copied
    }

    pub fn current_throughput(&self) -> u64 {
        self.state.lock().throughput.sum()
    }

    /// Measured bandwidth over the current rolling window (§4.2, §8
    /// invariant 5) — observed bytes on the wire, not the configured limit.
    pub fn current_bandwidth(&self) -> u64 {
        self.state.lock().bandwidth.sum()
    }

    pub fn pulse_count(&self) -> u64 {
        self.state.lock().pulse_count
    }

    pub fn ctrl_msg_count(&self) -> u64 {
        self.state.lock().ctrl_msg_count
    }

    pub fn last_ctrl_publish_time(&self) -> Option<SystemTime> {
        self.state.lock().last_ctrl_publish_time
    }
}

/// §4.2: on the three-minute tick, render one line per task type, sorted
/// lexicographically by name, as `type(count)[min,max,avg]`, then clear the
/// accumulated samples.
fn flush_durations(state: &Mutex<StatsState>) {
    let mut state = state.lock();
    if state.durations.is_empty() {
        return;
    }
    let mut entries: Vec<_> = state.durations.iter().collect();
    entries.sort_by_key(|(kind, _)| kind.as_str());
    let line = entries
        .iter()
        .map(|(kind, samples)| {
            format!(
                "{}({})[{:?},{:?},{:?}]",
                kind,
                samples.count,
                samples.min,
                samples.max,
                samples.avg()
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(target: "ta_engine::stats", "{line}");
    state.durations.clear();
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
