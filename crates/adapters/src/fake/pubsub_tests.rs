// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[tokio::test]
async fn pull_returns_enqueued_messages_in_order() {
    let bus = FakePubSub::new();
    bus.enqueue("copy-tasks", b"first".to_vec());
    bus.enqueue("copy-tasks", b"second".to_vec());
    let sub = bus.subscribe("copy-tasks").await.unwrap();

    let first = sub.pull(Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(first.payload, b"first");
    let second = sub.pull(Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(second.payload, b"second");
    assert!(sub.pull(Duration::from_secs(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn nack_redelivers_the_message() {
    let bus = FakePubSub::new();
    bus.enqueue("copy-tasks", b"payload".to_vec());
    let sub = bus.subscribe("copy-tasks").await.unwrap();

    let delivery = sub.pull(Duration::from_secs(1)).await.unwrap().unwrap();
    sub.nack(&delivery.message_id).await.unwrap();

    let redelivered = sub.pull(Duration::from_secs(1)).await.unwrap().unwrap();
    assert_eq!(redelivered.payload, b"payload");
}

#[tokio::test]
async fn ack_is_rejected_a_second_time() {
    let bus = FakePubSub::new();
    bus.enqueue("copy-tasks", b"payload".to_vec());
    let sub = bus.subscribe("copy-tasks").await.unwrap();
    let delivery = sub.pull(Duration::from_secs(1)).await.unwrap().unwrap();

    sub.ack(&delivery.message_id).await.unwrap();
    let err = sub.ack(&delivery.message_id).await.unwrap_err();
    assert!(matches!(err, PubSubError::AlreadySettled(_)));
}

#[tokio::test]
async fn publish_is_recorded_under_its_topic() {
    let bus = FakePubSub::new();
    bus.publish("progress", b"one".to_vec()).await.unwrap();
    bus.publish("progress", b"two".to_vec()).await.unwrap();
    assert_eq!(bus.published("progress"), vec![b"one".to_vec(), b"two".to_vec()]);
}
