// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task Processor (§4.9): per-task-type glue between the message bus and a
//! handler — decode, check job-run activation, dispatch, publish, ack.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use ta_adapters::{Delivery, PubSubAdapter, Subscription};
use ta_core::{wire, TaskKind, TaskRequest, TaskResponse};

use crate::handlers::TaskHandler;
use crate::rate_admission::RateAdmission;
use crate::stats::Stats;

/// Default pull timeout; long enough to avoid busy-polling an empty
/// subscription, short enough to notice cancellation promptly.
const DEFAULT_PULL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default lease-extension interval, used when a processor is built without
/// an explicit `pubsub-lease-extension` override.
const DEFAULT_LEASE_EXTENSION: Duration = Duration::from_secs(30);

pub struct TaskProcessor {
    subscription_name: String,
    progress_topic: String,
    pub_sub: Arc<dyn PubSubAdapter>,
    admission: RateAdmission,
    stats: Stats,
    handler: Arc<dyn TaskHandler>,
    kind: TaskKind,
    max_outstanding_messages: usize,
    lease_extension: Duration,
}

impl TaskProcessor {
    pub fn new(
        subscription_name: String,
        progress_topic: String,
        pub_sub: Arc<dyn PubSubAdapter>,
        admission: RateAdmission,
        stats: Stats,
        handler: Arc<dyn TaskHandler>,
        kind: TaskKind,
        max_outstanding_messages: usize,
    ) -> Self {
        Self {
            subscription_name,
            progress_topic,
            pub_sub,
            admission,
            stats,
            handler,
            kind,
            max_outstanding_messages,
            lease_extension: DEFAULT_LEASE_EXTENSION,
        }
    }

    /// Overrides the lease-extension interval (default 30s).
    pub fn with_lease_extension(mut self, lease_extension: Duration) -> Self {
        self.lease_extension = lease_extension;
        self
    }

    /// Runs the receive loop until `cancel` fires. Up to
    /// `max_outstanding_messages` deliveries are handled concurrently.
    pub async fn run(&self, cancel: CancellationToken) {
        let subscription: Arc<dyn Subscription> = match self.pub_sub.subscribe(&self.subscription_name).await {
            Ok(sub) => Arc::from(sub),
            Err(e) => {
                tracing::error!(error = %e, subscription = %self.subscription_name, "failed to subscribe");
                return;
            }
        };
        let semaphore = Arc::new(Semaphore::new(self.max_outstanding_messages.max(1)));

        loop {
            let permit = tokio::select! {
                _ = cancel.cancelled() => return,
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => return,
                },
            };

            let delivery = tokio::select! {
                _ = cancel.cancelled() => return,
                result = subscription.pull(DEFAULT_PULL_TIMEOUT) => result,
            };

            let delivery = match delivery {
                Ok(Some(d)) => d,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, subscription = %self.subscription_name, "pull failed");
                    continue;
                }
            };

            let subscription = Arc::clone(&subscription);
            let handler = Arc::clone(&self.handler);
            let pub_sub = Arc::clone(&self.pub_sub);
            let admission = self.admission.clone();
            let stats = self.stats.clone();
            let progress_topic = self.progress_topic.clone();
            let kind = self.kind;
            let task_cancel = cancel.clone();
            let lease_extension = self.lease_extension;

            tokio::spawn(async move {
                let _permit = permit;
                process_one(
                    delivery,
                    subscription,
                    handler,
                    pub_sub,
                    admission,
                    stats,
                    progress_topic,
                    kind,
                    lease_extension,
                    task_cancel,
                )
                .await;
            });
        }
    }
}

/// Cancelling a lease extender's token on drop covers every early-return
/// path in `process_one` without threading cleanup through each of them.
struct LeaseExtender {
    cancel: CancellationToken,
}

impl LeaseExtender {
    fn spawn(subscription: Arc<dyn Subscription>, message_id: String, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => return,
                    _ = ticker.tick() => {
                        if let Err(e) = subscription.extend_lease(&message_id, interval).await {
                            tracing::warn!(error = %e, message_id = %message_id, "lease extension failed");
                            return;
                        }
                    }
                }
            }
        });
        Self { cancel }
    }
}

impl Drop for LeaseExtender {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[allow(clippy::too_many_arguments)]
async fn process_one(
    delivery: Delivery,
    subscription: Arc<dyn Subscription>,
    handler: Arc<dyn TaskHandler>,
    pub_sub: Arc<dyn PubSubAdapter>,
    admission: RateAdmission,
    stats: Stats,
    progress_topic: String,
    kind: TaskKind,
    lease_extension: Duration,
    cancel: CancellationToken,
) {
    let started = Instant::now();
    let _lease_extender = LeaseExtender::spawn(Arc::clone(&subscription), delivery.message_id.clone(), lease_extension);

    let request: TaskRequest = match decode_request(&delivery.payload) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, message_id = %delivery.message_id, "failed to decode task request; acking to drop a non-recoverable message");
            let _ = subscription.ack(&delivery.message_id).await;
            return;
        }
    };

    let response = if !admission.is_job_run_active(&request.job_run_rel_resource_name) {
        TaskResponse::not_active_jobrun(&request)
    } else {
        tokio::select! {
            _ = cancel.cancelled() => return,
            response = handler.handle(&request.task_rel_resource_name, request.spec.clone()) => response,
        }
    };

    if !response.echoes(&request) {
        tracing::error!(message_id = %delivery.message_id, "task processor invariant violated: response.reqSpec did not echo request.spec; leaving unacked for redelivery");
        return;
    }

    if cancel.is_cancelled() {
        return;
    }

    let payload = match encode_response(&response) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, message_id = %delivery.message_id, "failed to encode task response");
            return;
        }
    };

    match pub_sub.publish(&progress_topic, payload).await {
        Ok(_) => {
            if let Err(e) = subscription.ack(&delivery.message_id).await {
                tracing::warn!(error = %e, message_id = %delivery.message_id, "ack failed after successful publish");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, message_id = %delivery.message_id, "publish failed; leaving unacked for redelivery");
        }
    }

    stats.record_task_duration(kind, started.elapsed());
}

fn decode_request(payload: &[u8]) -> Result<TaskRequest, wire::WireError> {
    let wire_request: wire::task::WireTaskRequest = wire::decode(payload)?;
    wire_request.try_into()
}

fn encode_response(response: &TaskResponse) -> Result<Vec<u8>, wire::WireError> {
    let wire_response: wire::task::WireTaskResponse = response.into();
    wire::encode(&wire_response)
}

#[cfg(test)]
#[path = "task_processor_tests.rs"]
mod tests;
