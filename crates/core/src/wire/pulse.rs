// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary wire form of [`crate::pulse::PulseMessage`].

use prost::Message;

use crate::identity::AgentIdentity;
use crate::pulse::PulseMessage;

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WirePulseMessage {
    #[prost(string, tag = "1")]
    pub host_name: String,
    #[prost(uint32, tag = "2")]
    pub process_id: u32,
    #[prost(string, tag = "3")]
    pub prefix: String,
    #[prost(string, tag = "4")]
    pub container_id: String,
    #[prost(string, tag = "5")]
    pub version: String,
    #[prost(string, tag = "6")]
    pub logs_dir: String,
    #[prost(uint64, tag = "7")]
    pub accumulated_bytes_copied: u64,
    #[prost(uint64, tag = "8")]
    pub uptime_ms: u64,
}

impl From<&PulseMessage> for WirePulseMessage {
    fn from(p: &PulseMessage) -> Self {
        Self {
            host_name: p.agent_id.host_name.clone(),
            process_id: p.agent_id.process_id,
            prefix: p.agent_id.prefix.clone().unwrap_or_default(),
            container_id: p.agent_id.container_id.clone().unwrap_or_default(),
            version: p.version.clone(),
            logs_dir: p.logs_dir.clone(),
            accumulated_bytes_copied: p.accumulated_bytes_copied,
            uptime_ms: p.uptime_ms,
        }
    }
}

impl From<WirePulseMessage> for PulseMessage {
    fn from(w: WirePulseMessage) -> Self {
        Self {
            agent_id: AgentIdentity {
                host_name: w.host_name,
                process_id: w.process_id,
                prefix: (!w.prefix.is_empty()).then_some(w.prefix),
                container_id: (!w.container_id.is_empty()).then_some(w.container_id),
            },
            version: w.version,
            logs_dir: w.logs_dir,
            accumulated_bytes_copied: w.accumulated_bytes_copied,
            uptime_ms: w.uptime_ms,
        }
    }
}

#[cfg(test)]
#[path = "pulse_tests.rs"]
mod tests;
