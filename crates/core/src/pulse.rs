// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PulseMessage`: the heartbeat published by `ta-engine::pulse`.
//!
//! Note: an earlier wire revision carried a `frequency` field; it was
//! removed mid-history and must not be re-added (open question #3).

use serde::{Deserialize, Serialize};

use crate::identity::AgentIdentity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseMessage {
    pub agent_id: AgentIdentity,
    pub version: String,
    pub logs_dir: String,
    pub accumulated_bytes_copied: u64,
    pub uptime_ms: u64,
}

#[cfg(test)]
#[path = "pulse_tests.rs"]
mod tests;
