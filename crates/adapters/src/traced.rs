// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability.

use async_trait::async_trait;
use std::time::Duration;
use tracing::Instrument;

use ta_core::GenerationPrecondition;

use crate::object_store::{ObjectMetadata, ObjectStoreAdapter, ObjectStoreError, ResumableSession};
use crate::pubsub::{Delivery, PubSubAdapter, PubSubError, Subscription};

/// Wrapper that adds tracing to any [`ObjectStoreAdapter`].
#[derive(Clone)]
pub struct TracedObjectStore<S> {
    inner: S,
}

impl<S> TracedObjectStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ObjectStoreAdapter> ObjectStoreAdapter for TracedObjectStore<S> {
    async fn write_object(
        &self,
        bucket: &str,
        object: &str,
        data: Vec<u8>,
        precondition: GenerationPrecondition,
    ) -> Result<ObjectMetadata, ObjectStoreError> {
        let len = data.len();
        async {
            tracing::info!(bytes = len, "writing object");
            let start = std::time::Instant::now();
            let result = self.inner.write_object(bucket, object, data, precondition).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(m) => tracing::info!(generation = m.generation, elapsed_ms, "object written"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "write failed"),
            }
            result
        }
        .instrument(tracing::info_span!("object_store.write", bucket, object))
        .await
    }

    async fn start_resumable_session(
        &self,
        bucket: &str,
        object: &str,
        total_size: u64,
        precondition: GenerationPrecondition,
    ) -> Result<ResumableSession, ObjectStoreError> {
        let result = self
            .inner
            .start_resumable_session(bucket, object, total_size, precondition)
            .await;
        match &result {
            Ok(s) => tracing::info!(bucket, object, upload_id = %s.upload_id, "resumable session started"),
            Err(e) => tracing::error!(bucket, object, error = %e, "start_resumable_session failed"),
        }
        result
    }

    async fn query_resumable_session(
        &self,
        upload_id: &str,
    ) -> Result<ResumableSession, ObjectStoreError> {
        let result = self.inner.query_resumable_session(upload_id).await;
        tracing::debug!(upload_id, committed = ?result.as_ref().map(|s| s.committed_bytes).ok(), "queried");
        result
    }

    async fn write_chunk(
        &self,
        upload_id: &str,
        offset: u64,
        data: Vec<u8>,
        final_chunk: bool,
    ) -> Result<Option<ObjectMetadata>, ObjectStoreError> {
        let len = data.len();
        let result = self.inner.write_chunk(upload_id, offset, data, final_chunk).await;
        match &result {
            Ok(_) => tracing::debug!(upload_id, offset, len, final_chunk, "chunk written"),
            Err(e) => tracing::error!(upload_id, offset, error = %e, "write_chunk failed"),
        }
        result
    }

    async fn delete_object(
        &self,
        bucket: &str,
        object: &str,
        precondition: Option<GenerationPrecondition>,
    ) -> Result<(), ObjectStoreError> {
        let result = self.inner.delete_object(bucket, object, precondition).await;
        match &result {
            Ok(()) => tracing::info!(bucket, object, "object deleted"),
            Err(e) => tracing::error!(bucket, object, error = %e, "delete failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any [`PubSubAdapter`].
#[derive(Clone)]
pub struct TracedPubSub<P> {
    inner: P,
}

impl<P> TracedPubSub<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: PubSubAdapter> PubSubAdapter for TracedPubSub<P> {
    async fn subscribe(&self, subscription_name: &str) -> Result<Box<dyn Subscription>, PubSubError> {
        let inner = self.inner.subscribe(subscription_name).await?;
        tracing::info!(subscription_name, "subscribed");
        Ok(Box::new(TracedSubscription {
            name: subscription_name.to_string(),
            inner,
        }))
    }

    async fn publish(&self, topic_name: &str, payload: Vec<u8>) -> Result<String, PubSubError> {
        let len = payload.len();
        let result = self.inner.publish(topic_name, payload).await;
        match &result {
            Ok(id) => tracing::info!(topic_name, message_id = %id, bytes = len, "published"),
            Err(e) => tracing::error!(topic_name, error = %e, "publish failed"),
        }
        result
    }
}

struct TracedSubscription {
    name: String,
    inner: Box<dyn Subscription>,
}

#[async_trait]
impl Subscription for TracedSubscription {
    async fn pull(&self, timeout: Duration) -> Result<Option<Delivery>, PubSubError> {
        let result = self.inner.pull(timeout).await;
        if let Ok(Some(d)) = &result {
            tracing::debug!(subscription = %self.name, message_id = %d.message_id, attempt = d.delivery_attempt, "pulled");
        }
        result
    }

    async fn extend_lease(&self, message_id: &str, extension: Duration) -> Result<(), PubSubError> {
        self.inner.extend_lease(message_id, extension).await
    }

    async fn ack(&self, message_id: &str) -> Result<(), PubSubError> {
        let result = self.inner.ack(message_id).await;
        if result.is_ok() {
            tracing::debug!(subscription = %self.name, message_id, "acked");
        }
        result
    }

    async fn nack(&self, message_id: &str) -> Result<(), PubSubError> {
        let result = self.inner.nack(message_id).await;
        if result.is_ok() {
            tracing::debug!(subscription = %self.name, message_id, "nacked");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
