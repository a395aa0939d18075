// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake pub/sub bus for deterministic testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::pubsub::{Delivery, PubSubAdapter, PubSubError, Subscription};

#[derive(Clone)]
pub struct FakePubSub {
    inner: Arc<Mutex<FakePubSubState>>,
    next_id: Arc<AtomicU64>,
}

struct FakePubSubState {
    queues: HashMap<String, VecDeque<Delivery>>,
    published: HashMap<String, Vec<Vec<u8>>>,
    leased: HashMap<String, Delivery>,
}

impl Default for FakePubSub {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePubSub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakePubSubState {
                queues: HashMap::new(),
                published: HashMap::new(),
                leased: HashMap::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Enqueue a message as if delivered from an external publisher.
    pub fn enqueue(&self, subscription_name: &str, payload: Vec<u8>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .lock()
            .queues
            .entry(subscription_name.to_string())
            .or_default()
            .push_back(Delivery {
                message_id: format!("msg-{id}"),
                payload,
                delivery_attempt: 1,
            });
    }

    /// Messages published to a topic so far.
    pub fn published(&self, topic_name: &str) -> Vec<Vec<u8>> {
        self.inner
            .lock()
            .published
            .get(topic_name)
            .cloned()
            .unwrap_or_default()
    }
}

struct FakeSubscription {
    name: String,
    state: Arc<Mutex<FakePubSubState>>,
}

#[async_trait]
impl Subscription for FakeSubscription {
    async fn pull(&self, _timeout: Duration) -> Result<Option<Delivery>, PubSubError> {
        let mut state = self.state.lock();
        let Some(delivery) = state
            .queues
            .get_mut(&self.name)
            .and_then(VecDeque::pop_front)
        else {
            return Ok(None);
        };
        state.leased.insert(delivery.message_id.clone(), clone_delivery(&delivery));
        Ok(Some(delivery))
    }

    async fn extend_lease(&self, message_id: &str, _extension: Duration) -> Result<(), PubSubError> {
        if self.state.lock().leased.contains_key(message_id) {
            Ok(())
        } else {
            Err(PubSubError::AlreadySettled(message_id.to_string()))
        }
    }

    async fn ack(&self, message_id: &str) -> Result<(), PubSubError> {
        self.state
            .lock()
            .leased
            .remove(message_id)
            .map(|_| ())
            .ok_or_else(|| PubSubError::AlreadySettled(message_id.to_string()))
    }

    async fn nack(&self, message_id: &str) -> Result<(), PubSubError> {
        let mut state = self.state.lock();
        let delivery = state
            .leased
            .remove(message_id)
            .ok_or_else(|| PubSubError::AlreadySettled(message_id.to_string()))?;
        state
            .queues
            .entry(self.name.clone())
            .or_default()
            .push_back(delivery);
        Ok(())
    }
}

fn clone_delivery(d: &Delivery) -> Delivery {
    Delivery {
        message_id: d.message_id.clone(),
        payload: d.payload.clone(),
        delivery_attempt: d.delivery_attempt,
    }
}

#[async_trait]
impl PubSubAdapter for FakePubSub {
    async fn subscribe(&self, subscription_name: &str) -> Result<Box<dyn Subscription>, PubSubError> {
        self.inner
            .lock()
            .queues
            .entry(subscription_name.to_string())
            .or_default();
        Ok(Box::new(FakeSubscription {
            name: subscription_name.to_string(),
            state: self.inner.clone(),
        }))
    }

    async fn publish(&self, topic_name: &str, payload: Vec<u8>) -> Result<String, PubSubError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .lock()
            .published
            .entry(topic_name.to_string())
            .or_default()
            .push(payload);
        Ok(format!("msg-{id}"))
    }
}

#[cfg(test)]
#[path = "pubsub_tests.rs"]
mod tests;
