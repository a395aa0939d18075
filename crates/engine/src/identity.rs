// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Identity & Update (§4.10): the update-hint file written for an
//! external supervisor to read, and the FNV1a64 hash used to derive this
//! process's private control subscription name.

use std::path::PathBuf;

use ta_core::{AgentIdentity, ControlMessage};

/// Writes/removes `<logsDir>/agent_source_<pid>.txt` in response to control
/// messages, per §4.10.
pub struct AgentUpdateWriter {
    hint_path: PathBuf,
}

impl AgentUpdateWriter {
    pub fn new(logs_dir: &std::path::Path, process_id: u32) -> Self {
        Self {
            hint_path: logs_dir.join(format!("agent_source_{process_id}.txt")),
        }
    }

    /// Apply one control message's update hints for `identity`. If a source
    /// names this agent, atomically (create+truncate) write its `updateUrl`;
    /// otherwise remove the file if present.
    pub async fn apply(&self, identity: &AgentIdentity, message: &ControlMessage) -> std::io::Result<()> {
        match message.update_for(identity) {
            Some(update_url) => self.write_hint(update_url).await,
            None => self.remove_hint().await,
        }
    }

    async fn write_hint(&self, update_url: &str) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        if let Some(parent) = self.hint_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.hint_path, update_url).await?;
        tokio::fs::set_permissions(&self.hint_path, std::fs::Permissions::from_mode(0o755)).await?;
        Ok(())
    }

    async fn remove_hint(&self) -> std::io::Result<()> {
        match tokio::fs::remove_file(&self.hint_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// FNV-1a 64-bit hash, used for the per-process control subscription name
/// `<prefix>control-<FNV1a64(hostname|pid)>` (§6).
pub fn fnv1a64(input: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Derives the control subscription name from the agent's identity.
pub fn control_subscription_name(prefix: &str, identity: &AgentIdentity) -> String {
    let key = format!("{}|{}", identity.host_name, identity.process_id);
    format!("{prefix}control-{:x}", fnv1a64(&key))
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
