// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pulse Emitter (§4.8): a periodic heartbeat carrying agent identity,
//! version, uptime, and cumulative transferred bytes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use ta_adapters::PubSubAdapter;
use ta_core::{wire, AgentIdentity, PulseMessage};

use crate::stats::Stats;

pub const DEFAULT_PULSE_INTERVAL: Duration = Duration::from_secs(10);

pub struct PulseEmitter {
    pub_sub: Arc<dyn PubSubAdapter>,
    topic: String,
    stats: Stats,
    identity: AgentIdentity,
    version: String,
    logs_dir: String,
    interval: Duration,
}

impl PulseEmitter {
    pub fn new(
        pub_sub: Arc<dyn PubSubAdapter>,
        topic: String,
        stats: Stats,
        identity: AgentIdentity,
        version: String,
        logs_dir: String,
        interval: Duration,
    ) -> Self {
        Self {
            pub_sub,
            topic,
            stats,
            identity,
            version,
            logs_dir,
            interval,
        }
    }

    /// Runs until `cancel` fires. Publish errors are logged and do not stop
    /// the loop (§4.8).
    pub async fn run(&self, cancel: CancellationToken) {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    self.emit_once(started).await;
                }
            }
        }
    }

    async fn emit_once(&self, started: Instant) {
        let message = PulseMessage {
            agent_id: self.identity.clone(),
            version: self.version.clone(),
            logs_dir: self.logs_dir.clone(),
            accumulated_bytes_copied: self.stats.accumulated_bytes_copied(),
            uptime_ms: started.elapsed().as_millis() as u64,
        };

        let wire_message: wire::pulse::WirePulseMessage = (&message).into();
        let payload = match wire::encode(&wire_message) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode pulse message");
                return;
            }
        };

        match self.pub_sub.publish(&self.topic, payload).await {
            Ok(_) => self.stats.record_pulse(),
            Err(e) => tracing::warn!(error = %e, "failed to publish pulse"),
        }
    }
}

#[cfg(test)]
#[path = "pulse_tests.rs"]
mod tests;
