// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::{Duration, SystemTime};

use ta_core::AgentIdentity;

use super::*;

fn identity() -> AgentIdentity {
    AgentIdentity {
        host_name: "h".to_string(),
        process_id: 1,
        prefix: None,
        container_id: None,
    }
}

fn control_handler(dir: &std::path::Path) -> ControlHandler {
    let admission = RateAdmission::new(-1, Stats::spawn());
    let writer = AgentUpdateWriter::new(dir, 1);
    ControlHandler::new(admission, Stats::spawn(), writer, identity())
}

fn message_at(publish_time: SystemTime, bw: i64) -> ControlMessage {
    ControlMessage {
        job_runs_bandwidths: [("job-a".to_string(), bw)].into_iter().collect(),
        agent_update_sources: Vec::new(),
        publish_time,
    }
}

#[tokio::test]
async fn applies_messages_in_increasing_publish_time_order() {
    let dir = tempfile::tempdir().unwrap();
    let handler = control_handler(dir.path());
    let t0 = SystemTime::UNIX_EPOCH;
    let t1 = t0 + Duration::from_secs(10);

    assert!(handler.handle(message_at(t0, 20)).await);
    assert!(handler.handle(message_at(t1, 40)).await);
}

#[tokio::test]
async fn stale_control_message_is_dropped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let handler = control_handler(dir.path());
    let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
    let stale = SystemTime::UNIX_EPOCH + Duration::from_secs(90);

    assert!(handler.handle(message_at(t0, 20)).await);
    assert!(!handler.handle(message_at(stale, 999)).await);

    // the stale message's bandwidth must not have taken effect.
    assert!(handler.admission.is_job_run_active("job-a"));
}
