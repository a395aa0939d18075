// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subsystem Wiring (§6): topic/subscription names, delivery tuning, and
//! assembly of the task processors, control loop, and pulse emitter into one
//! running agent.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use ta_adapters::{ObjectStoreAdapter, PubSubAdapter, Subscription};
use ta_core::{wire, AgentIdentity, ControlMessage, TaskKind};

use crate::handlers::{ControlHandler, CopyHandler, DeleteHandler, ListHandler, TaskHandler};
use crate::identity::{control_subscription_name, AgentUpdateWriter};
use crate::pulse::PulseEmitter;
use crate::rate_admission::RateAdmission;
use crate::stats::Stats;
use crate::task_processor::TaskProcessor;

pub const LIST_MAX_OUTSTANDING_MESSAGES: usize = 4;
pub const DELETE_MAX_OUTSTANDING_MESSAGES: usize = 10;
pub const CONTROL_MAX_OUTSTANDING_MESSAGES: usize = 1;
pub const DEFAULT_COPY_TASKS_PER_CPU: usize = 2;
pub const DEFAULT_MAX_EXTENSION: Duration = Duration::from_secs(120 * 60);
pub const DEFAULT_MAX_OUTSTANDING_BYTES: u64 = 1024 * 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: u64 = 32 * 1024 * 1024;
const CONTROL_PULL_TIMEOUT: Duration = Duration::from_secs(5);

/// Subscription and topic names for one agent. All but the control
/// subscription are derived from a shared `pubsub-prefix` (§6); the control
/// subscription is per-process (§4.10).
pub struct Topics {
    pub list_subscription: String,
    pub copy_subscription: String,
    pub delete_subscription: String,
    pub control_subscription: String,
    pub list_progress_topic: String,
    pub copy_progress_topic: String,
    pub delete_progress_topic: String,
    pub pulse_topic: String,
    pub control_topic: String,
}

impl Topics {
    pub fn new(prefix: &str, identity: &AgentIdentity) -> Self {
        Self {
            list_subscription: format!("{prefix}list"),
            copy_subscription: format!("{prefix}copy"),
            delete_subscription: format!("{prefix}delete"),
            control_subscription: control_subscription_name(prefix, identity),
            list_progress_topic: format!("{prefix}list-progress"),
            copy_progress_topic: format!("{prefix}copy-progress"),
            delete_progress_topic: format!("{prefix}delete-object-progress"),
            pulse_topic: format!("{prefix}pulse"),
            control_topic: format!("{prefix}control"),
        }
    }
}

/// Process-wide configuration needed to wire the task processors, control
/// loop, and pulse emitter together (§6: "Required configuration").
pub struct WiringConfig {
    pub pubsub_prefix: String,
    pub chunk_size: u64,
    /// Explicit `copy-tasks` override; `None` falls back to
    /// `copy_tasks_per_cpu × available parallelism`.
    pub copy_tasks: Option<usize>,
    pub copy_tasks_per_cpu: usize,
    /// Explicit `delete-tasks` override; `0` falls back to
    /// `DELETE_MAX_OUTSTANDING_MESSAGES`.
    pub delete_tasks: usize,
    pub concurrent_read_max: i64,
    pub mount_directory: String,
    pub logs_dir: String,
    pub version: String,
    pub pulse_interval: Duration,
    pub pubsub_lease_extension: Duration,
}

impl WiringConfig {
    pub fn copy_max_outstanding_messages(&self) -> usize {
        self.copy_tasks.unwrap_or_else(|| {
            let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
            self.copy_tasks_per_cpu * cpus
        })
    }

    pub fn delete_max_outstanding_messages(&self) -> usize {
        if self.delete_tasks == 0 {
            DELETE_MAX_OUTSTANDING_MESSAGES
        } else {
            self.delete_tasks
        }
    }
}

/// Everything one running agent process needs, assembled once at startup
/// and handed off to five long-running loops (§5: "parallel cooperative
/// tasks").
pub struct Agent {
    pub topics: Topics,
    pub config: WiringConfig,
    pub pub_sub: Arc<dyn PubSubAdapter>,
    pub store: Arc<dyn ObjectStoreAdapter>,
    pub admission: RateAdmission,
    pub stats: Stats,
    pub identity: AgentIdentity,
    pub update_writer: AgentUpdateWriter,
}

impl Agent {
    /// Spawns the copy, list, delete, control, and pulse loops. Every loop
    /// observes `cancel` and exits promptly when it fires (§5).
    pub fn spawn(self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        let copy_handler: Arc<dyn TaskHandler> = Arc::new(CopyHandler::new(
            Arc::clone(&self.store),
            self.admission.clone(),
            self.stats.clone(),
            self.config.chunk_size,
            self.config.mount_directory.clone(),
        ));
        let list_handler: Arc<dyn TaskHandler> =
            Arc::new(ListHandler::new(Arc::clone(&self.store), self.config.mount_directory.clone()));
        let delete_handler: Arc<dyn TaskHandler> = Arc::new(DeleteHandler::new(Arc::clone(&self.store)));
        let control_handler = Arc::new(ControlHandler::new(
            self.admission.clone(),
            self.stats.clone(),
            self.update_writer,
            self.identity.clone(),
        ));

        let copy_processor = TaskProcessor::new(
            self.topics.copy_subscription,
            self.topics.copy_progress_topic,
            Arc::clone(&self.pub_sub),
            self.admission.clone(),
            self.stats.clone(),
            copy_handler,
            TaskKind::Copy,
            self.config.copy_max_outstanding_messages(),
        )
        .with_lease_extension(self.config.pubsub_lease_extension);
        let list_processor = TaskProcessor::new(
            self.topics.list_subscription,
            self.topics.list_progress_topic,
            Arc::clone(&self.pub_sub),
            self.admission.clone(),
            self.stats.clone(),
            list_handler,
            TaskKind::List,
            LIST_MAX_OUTSTANDING_MESSAGES,
        )
        .with_lease_extension(self.config.pubsub_lease_extension);
        let delete_processor = TaskProcessor::new(
            self.topics.delete_subscription,
            self.topics.delete_progress_topic,
            Arc::clone(&self.pub_sub),
            self.admission.clone(),
            self.stats.clone(),
            delete_handler,
            TaskKind::Delete,
            self.config.delete_max_outstanding_messages(),
        )
        .with_lease_extension(self.config.pubsub_lease_extension);
        let pulse_emitter = PulseEmitter::new(
            Arc::clone(&self.pub_sub),
            self.topics.pulse_topic,
            self.stats.clone(),
            self.identity,
            self.config.version,
            self.config.logs_dir,
            self.config.pulse_interval,
        );

        let control_subscription = self.topics.control_subscription;
        let control_pub_sub = Arc::clone(&self.pub_sub);

        vec![
            tokio::spawn({
                let cancel = cancel.clone();
                async move { copy_processor.run(cancel).await }
            }),
            tokio::spawn({
                let cancel = cancel.clone();
                async move { list_processor.run(cancel).await }
            }),
            tokio::spawn({
                let cancel = cancel.clone();
                async move { delete_processor.run(cancel).await }
            }),
            tokio::spawn({
                let cancel = cancel.clone();
                async move { run_control_loop(control_subscription, control_pub_sub, control_handler, cancel).await }
            }),
            tokio::spawn({
                let cancel = cancel.clone();
                async move { pulse_emitter.run(cancel).await }
            }),
        ]
    }
}

/// Drives the control subscription (§4.7). Control messages never publish a
/// response; a message is acked once `ControlHandler` has either applied or
/// rejected it as stale. Decode failures are acked and dropped — there is no
/// useful redelivery target for a message this agent cannot parse.
///
/// Note: the control subscription is meant to be deleted on graceful
/// shutdown (§6); `PubSubAdapter` exposes no such operation today, so that
/// step is left to the concrete adapter's own lifecycle management.
async fn run_control_loop(
    subscription_name: String,
    pub_sub: Arc<dyn PubSubAdapter>,
    handler: Arc<ControlHandler>,
    cancel: CancellationToken,
) {
    let subscription: Arc<dyn Subscription> = match pub_sub.subscribe(&subscription_name).await {
        Ok(sub) => Arc::from(sub),
        Err(e) => {
            tracing::error!(error = %e, subscription = %subscription_name, "failed to subscribe to control");
            return;
        }
    };

    loop {
        let delivery = tokio::select! {
            _ = cancel.cancelled() => return,
            result = subscription.pull(CONTROL_PULL_TIMEOUT) => result,
        };

        let delivery = match delivery {
            Ok(Some(d)) => d,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, subscription = %subscription_name, "control pull failed");
                continue;
            }
        };

        let message: Result<ControlMessage, wire::WireError> =
            wire::decode::<wire::control::WireControlMessage>(&delivery.payload).map(ControlMessage::from);

        match message {
            Ok(message) => {
                handler.handle(message).await;
            }
            Err(e) => {
                tracing::error!(error = %e, message_id = %delivery.message_id, "failed to decode control message; acking to drop");
            }
        }

        if let Err(e) = subscription.ack(&delivery.message_id).await {
            tracing::warn!(error = %e, message_id = %delivery.message_id, "ack failed for control message");
        }
    }
}

#[cfg(test)]
#[path = "wiring_tests.rs"]
mod tests;
