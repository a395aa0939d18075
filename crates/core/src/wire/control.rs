// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary wire form of [`crate::control::ControlMessage`].

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use prost::Message;

use crate::control::{AgentUpdateSource, ControlMessage};
use crate::wire::identity::WireAgentIdentity;

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireAgentUpdateSource {
    #[prost(message, repeated, tag = "1")]
    pub agent_ids: Vec<WireAgentIdentity>,
    #[prost(string, tag = "2")]
    pub update_url: String,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireControlMessage {
    #[prost(map = "string, int64", tag = "1")]
    pub job_runs_bandwidths: HashMap<String, i64>,
    #[prost(message, repeated, tag = "2")]
    pub agent_update_sources: Vec<WireAgentUpdateSource>,
    /// Milliseconds since the Unix epoch.
    #[prost(int64, tag = "3")]
    pub publish_time_millis: i64,
}

fn millis_since_epoch(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn system_time_from_millis(millis: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(millis.max(0) as u64)
}

impl From<&AgentUpdateSource> for WireAgentUpdateSource {
    fn from(s: &AgentUpdateSource) -> Self {
        Self {
            agent_ids: s.agent_ids.iter().map(WireAgentIdentity::from).collect(),
            update_url: s.update_url.clone(),
        }
    }
}

impl From<WireAgentUpdateSource> for AgentUpdateSource {
    fn from(w: WireAgentUpdateSource) -> Self {
        Self {
            agent_ids: w.agent_ids.into_iter().map(Into::into).collect(),
            update_url: w.update_url,
        }
    }
}

impl From<&ControlMessage> for WireControlMessage {
    fn from(m: &ControlMessage) -> Self {
        Self {
            job_runs_bandwidths: m.job_runs_bandwidths.clone(),
            agent_update_sources: m
                .agent_update_sources
                .iter()
                .map(WireAgentUpdateSource::from)
                .collect(),
            publish_time_millis: millis_since_epoch(m.publish_time),
        }
    }
}

impl From<WireControlMessage> for ControlMessage {
    fn from(w: WireControlMessage) -> Self {
        Self {
            job_runs_bandwidths: w.job_runs_bandwidths,
            agent_update_sources: w
                .agent_update_sources
                .into_iter()
                .map(Into::into)
                .collect(),
            publish_time: system_time_from_millis(w.publish_time_millis),
        }
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
