// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use ta_adapters::{FakeObjectStore, FakePubSub};
use ta_core::{AgentIdentity, ControlMessage};

use super::*;

fn identity() -> AgentIdentity {
    AgentIdentity {
        host_name: "host-a".to_string(),
        process_id: 42,
        prefix: None,
        container_id: None,
    }
}

#[test]
fn topic_names_are_derived_from_the_prefix() {
    let topics = Topics::new("acme-", &identity());
    assert_eq!(topics.copy_subscription, "acme-copy");
    assert_eq!(topics.delete_progress_topic, "acme-delete-object-progress");
    assert_eq!(topics.pulse_topic, "acme-pulse");
    assert!(topics.control_subscription.starts_with("acme-control-"));
    assert_ne!(topics.control_subscription, "acme-control-");
}

#[test]
fn copy_max_outstanding_messages_prefers_explicit_override() {
    let config = WiringConfig {
        pubsub_prefix: String::new(),
        chunk_size: DEFAULT_CHUNK_SIZE,
        copy_tasks: Some(7),
        copy_tasks_per_cpu: DEFAULT_COPY_TASKS_PER_CPU,
        delete_tasks: 0,
        concurrent_read_max: -1,
        mount_directory: String::new(),
        logs_dir: "/tmp".to_string(),
        version: "0.0.0".to_string(),
        pulse_interval: Duration::from_secs(10),
        pubsub_lease_extension: Duration::from_secs(30),
    };
    assert_eq!(config.copy_max_outstanding_messages(), 7);
}

#[test]
fn copy_max_outstanding_messages_falls_back_to_per_cpu_scaling() {
    let config = WiringConfig {
        pubsub_prefix: String::new(),
        chunk_size: DEFAULT_CHUNK_SIZE,
        copy_tasks: None,
        copy_tasks_per_cpu: 3,
        delete_tasks: 0,
        concurrent_read_max: -1,
        mount_directory: String::new(),
        logs_dir: "/tmp".to_string(),
        version: "0.0.0".to_string(),
        pulse_interval: Duration::from_secs(10),
        pubsub_lease_extension: Duration::from_secs(30),
    };
    let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    assert_eq!(config.copy_max_outstanding_messages(), 3 * cpus);
}

#[test]
fn delete_max_outstanding_messages_defaults_when_unset() {
    let config = WiringConfig {
        pubsub_prefix: String::new(),
        chunk_size: DEFAULT_CHUNK_SIZE,
        copy_tasks: None,
        copy_tasks_per_cpu: DEFAULT_COPY_TASKS_PER_CPU,
        delete_tasks: 0,
        concurrent_read_max: -1,
        mount_directory: String::new(),
        logs_dir: "/tmp".to_string(),
        version: "0.0.0".to_string(),
        pulse_interval: Duration::from_secs(10),
        pubsub_lease_extension: Duration::from_secs(30),
    };
    assert_eq!(config.delete_max_outstanding_messages(), DELETE_MAX_OUTSTANDING_MESSAGES);
}

#[tokio::test]
async fn control_loop_applies_a_decodable_message_and_acks_it() {
    let pub_sub = FakePubSub::new();
    let wire_message: wire::control::WireControlMessage = (&ControlMessage {
        job_runs_bandwidths: [("job-a".to_string(), 10)].into_iter().collect(),
        agent_update_sources: Vec::new(),
        publish_time: std::time::SystemTime::UNIX_EPOCH,
    })
        .into();
    pub_sub.enqueue("control-sub", wire::encode(&wire_message).unwrap());

    let admission = RateAdmission::new(-1, Stats::spawn());
    let update_writer = AgentUpdateWriter::new(std::path::Path::new("/tmp"), 1);
    let handler = Arc::new(ControlHandler::new(admission.clone(), Stats::spawn(), update_writer, identity()));

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let pub_sub_clone = Arc::new(pub_sub.clone());
    let handle = tokio::spawn(async move {
        run_control_loop("control-sub".to_string(), pub_sub_clone, handler, cancel_clone).await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    let _ = handle.await;

    assert!(admission.is_job_run_active("job-a"));
}

#[tokio::test]
async fn control_loop_acks_and_drops_an_undecodable_message() {
    let pub_sub = FakePubSub::new();
    pub_sub.enqueue("control-sub", vec![0xff, 0xff, 0xff]);

    let admission = RateAdmission::new(-1, Stats::spawn());
    let update_writer = AgentUpdateWriter::new(std::path::Path::new("/tmp"), 1);
    let handler = Arc::new(ControlHandler::new(admission, Stats::spawn(), update_writer, identity()));

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let pub_sub_clone = Arc::new(pub_sub.clone());
    let handle = tokio::spawn(async move {
        run_control_loop("control-sub".to_string(), pub_sub_clone, handler, cancel_clone).await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    let _ = handle.await;
}

#[tokio::test]
async fn agent_spawn_starts_five_loops_that_all_exit_on_cancellation() {
    let pub_sub: Arc<dyn ta_adapters::PubSubAdapter> = Arc::new(FakePubSub::new());
    let store: Arc<dyn ta_adapters::ObjectStoreAdapter> = Arc::new(FakeObjectStore::new());
    let stats = Stats::spawn();
    let admission = RateAdmission::new(-1, stats.clone());
    let update_writer = AgentUpdateWriter::new(std::path::Path::new("/tmp"), 7);

    let agent = Agent {
        topics: Topics::new("t-", &identity()),
        config: WiringConfig {
            pubsub_prefix: "t-".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            copy_tasks: Some(1),
            copy_tasks_per_cpu: DEFAULT_COPY_TASKS_PER_CPU,
            delete_tasks: 1,
            concurrent_read_max: -1,
            mount_directory: String::new(),
            logs_dir: "/tmp".to_string(),
            version: "0.0.0".to_string(),
            pulse_interval: Duration::from_secs(60),
            pubsub_lease_extension: Duration::from_secs(30),
        },
        pub_sub,
        store,
        admission,
        stats,
        identity: identity(),
        update_writer,
    };

    let cancel = CancellationToken::new();
    let handles = agent.spawn(cancel.clone());
    assert_eq!(handles.len(), 5);

    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();
    for handle in handles {
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }
}
