// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ControlMessage`: the out-of-band control-plane payload applied by
//! `ta-engine::handlers::control` to the process-wide rate/admission state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;

use crate::identity::AgentIdentity;

/// One entry in `ControlMessage::agent_update_sources`: the agents that
/// should roll forward to `update_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdateSource {
    pub agent_ids: Vec<AgentIdentity>,
    pub update_url: String,
}

/// Control-plane message: project-wide bandwidth caps plus update hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Per-job-run byte-rate caps. A job run is active iff its mapped rate
    /// is nonzero; unknown job runs are inactive.
    pub job_runs_bandwidths: HashMap<String, i64>,
    pub agent_update_sources: Vec<AgentUpdateSource>,
    pub publish_time: SystemTime,
}

impl ControlMessage {
    /// Σ of all per-job-run rates: the new project-wide cap.
    pub fn total_bandwidth(&self) -> i64 {
        self.job_runs_bandwidths.values().sum()
    }

    /// Find the update hint that names `agent`, if any.
    pub fn update_for(&self, agent: &AgentIdentity) -> Option<&str> {
        self.agent_update_sources
            .iter()
            .find(|src| src.agent_ids.contains(agent))
            .map(|src| src.update_url.as_str())
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
