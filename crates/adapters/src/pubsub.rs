// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PubSubAdapter`: the message-bus surface the task processor and control
//! handler drive. One subscription per task kind plus one for control
//! messages and one topic for progress responses (§6).

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PubSubError {
    #[error("subscription {0} not found")]
    SubscriptionNotFound(String),

    #[error("topic {0} not found")]
    TopicNotFound(String),

    #[error("message {0} already acked or nacked")]
    AlreadySettled(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// One delivered message, with enough metadata to extend its lease or ack.
pub struct Delivery {
    pub message_id: String,
    pub payload: Vec<u8>,
    pub delivery_attempt: u32,
}

/// A leased, in-flight message a handler is currently processing.
#[async_trait]
pub trait Subscription: Send + Sync {
    /// Block until a message is available or `timeout` elapses.
    async fn pull(&self, timeout: Duration) -> Result<Option<Delivery>, PubSubError>;

    /// Extend the ack deadline so a long-running handler isn't redelivered
    /// out from under itself (§5: pubsub-lease-extension).
    async fn extend_lease(&self, message_id: &str, extension: Duration)
        -> Result<(), PubSubError>;

    async fn ack(&self, message_id: &str) -> Result<(), PubSubError>;

    /// Release the lease early so the message is redelivered promptly,
    /// used when a handler determines the job run is not active.
    async fn nack(&self, message_id: &str) -> Result<(), PubSubError>;
}

/// Publish-side and subscribe-side message bus access.
#[async_trait]
pub trait PubSubAdapter: Send + Sync {
    async fn subscribe(&self, subscription_name: &str) -> Result<Box<dyn Subscription>, PubSubError>;

    async fn publish(&self, topic_name: &str, payload: Vec<u8>) -> Result<String, PubSubError>;
}

#[cfg(test)]
#[path = "pubsub_tests.rs"]
mod tests;
