// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use super::*;
use crate::identity::AgentIdentity;

#[test]
fn control_message_round_trips_through_wire_form() {
    let mut job_runs_bandwidths = HashMap::new();
    job_runs_bandwidths.insert("jr-1".to_string(), 1_000_000i64);
    job_runs_bandwidths.insert("jr-2".to_string(), 2_000_000i64);

    let domain = ControlMessage {
        job_runs_bandwidths,
        agent_update_sources: vec![AgentUpdateSource {
            agent_ids: vec![AgentIdentity {
                host_name: "h".into(),
                process_id: 1,
                prefix: None,
                container_id: None,
            }],
            update_url: "https://example/update".into(),
        }],
        publish_time: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
    };

    let wire = WireControlMessage::from(&domain);
    let bytes = crate::wire::codec::encode(&wire).unwrap();
    let decoded: WireControlMessage = crate::wire::codec::decode(&bytes).unwrap();
    let back = ControlMessage::from(decoded);

    assert_eq!(back.job_runs_bandwidths, domain.job_runs_bandwidths);
    assert_eq!(back.agent_update_sources, domain.agent_update_sources);
    // Millisecond-precision round trip, not exact SystemTime equality.
    assert_eq!(
        back.publish_time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis(),
        domain
            .publish_time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis()
    );
}

#[test]
fn negative_or_missing_publish_time_clamps_to_epoch() {
    assert_eq!(system_time_from_millis(-5), SystemTime::UNIX_EPOCH);
}
