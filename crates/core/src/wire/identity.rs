// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary wire form of [`crate::identity::AgentIdentity`].

use prost::Message;

use crate::identity::AgentIdentity;

#[derive(Clone, PartialEq, Eq, Message)]
pub struct WireAgentIdentity {
    #[prost(string, tag = "1")]
    pub host_name: String,
    #[prost(uint32, tag = "2")]
    pub process_id: u32,
    #[prost(string, tag = "3")]
    pub prefix: String,
    #[prost(string, tag = "4")]
    pub container_id: String,
}

impl From<&AgentIdentity> for WireAgentIdentity {
    fn from(a: &AgentIdentity) -> Self {
        Self {
            host_name: a.host_name.clone(),
            process_id: a.process_id,
            prefix: a.prefix.clone().unwrap_or_default(),
            container_id: a.container_id.clone().unwrap_or_default(),
        }
    }
}

impl From<WireAgentIdentity> for AgentIdentity {
    fn from(w: WireAgentIdentity) -> Self {
        Self {
            host_name: w.host_name,
            process_id: w.process_id,
            prefix: (!w.prefix.is_empty()).then_some(w.prefix),
            container_id: (!w.container_id.is_empty()).then_some(w.container_id),
        }
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
