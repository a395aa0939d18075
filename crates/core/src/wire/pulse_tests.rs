// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn pulse_round_trips_through_domain_and_wire_forms() {
    let domain = PulseMessage {
        agent_id: AgentIdentity {
            host_name: "h".into(),
            process_id: 9,
            prefix: Some("p-".into()),
            container_id: None,
        },
        version: "2.0.0".into(),
        logs_dir: "/var/log/agent".into(),
        accumulated_bytes_copied: 42,
        uptime_ms: 1000,
    };
    let wire = WirePulseMessage::from(&domain);
    let bytes = crate::wire::codec::encode(&wire).unwrap();
    let decoded: WirePulseMessage = crate::wire::codec::decode(&bytes).unwrap();
    let back = PulseMessage::from(decoded);
    assert_eq!(back, domain);
}

#[test]
fn absent_optional_identity_fields_round_trip_as_none() {
    let domain = PulseMessage {
        agent_id: AgentIdentity {
            host_name: "h".into(),
            process_id: 1,
            prefix: None,
            container_id: None,
        },
        version: "1.0.0".into(),
        logs_dir: "/log".into(),
        accumulated_bytes_copied: 0,
        uptime_ms: 0,
    };
    let wire = WirePulseMessage::from(&domain);
    assert_eq!(wire.prefix, "");
    assert_eq!(wire.container_id, "");
    let back = PulseMessage::from(wire);
    assert_eq!(back.agent_id.prefix, None);
    assert_eq!(back.agent_id.container_id, None);
}
