// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AgentIdentity`: process-lifetime-immutable identity used to match
//! control-plane update hints and to stamp pulses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub host_name: String,
    pub process_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl AgentIdentity {
    /// Build the identity for the current process.
    ///
    /// `hostname_override` takes priority when the agent is containerized
    /// (§4.10: "Hostname is taken from a configured override when
    /// containerized, else from the OS").
    pub fn resolve(
        hostname_override: Option<String>,
        prefix: Option<String>,
        container_id: Option<String>,
    ) -> Self {
        let host_name = hostname_override.unwrap_or_else(|| {
            gethostname::gethostname()
                .into_string()
                .unwrap_or_else(|_| "unknown-host".to_string())
        });
        Self {
            host_name,
            process_id: std::process::id(),
            prefix,
            container_id,
        }
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
