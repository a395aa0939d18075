// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration (§6: "Required configuration").

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// On-premises transfer agent: pulls tasks from a message bus, uploads files
/// to a cloud object store, and reports progress.
#[derive(Debug, Clone, Parser)]
#[command(name = "transfer-agent")]
pub struct Config {
    /// Cloud project identifier the message bus and object store live in.
    #[arg(long, env = "TRANSFER_AGENT_PROJECT_ID")]
    pub project_id: String,

    /// Path to a service-account credentials file for the object store and
    /// message bus clients.
    #[arg(long, env = "TRANSFER_AGENT_CREDENTIALS")]
    pub credentials_path: PathBuf,

    /// Prefix shared by every subscription and topic name (§6).
    #[arg(long, env = "TRANSFER_AGENT_PUBSUB_PREFIX", default_value = "")]
    pub pubsub_prefix: String,

    /// Extra identity component folded into the agent-update match and the
    /// control subscription name (§4.10).
    #[arg(long, env = "TRANSFER_AGENT_ID_PREFIX")]
    pub agent_id_prefix: Option<String>,

    /// Hostname override used instead of the OS hostname when containerized
    /// (§4.10).
    #[arg(long, env = "TRANSFER_AGENT_HOSTNAME_OVERRIDE")]
    pub hostname_override: Option<String>,

    /// Resumable-upload chunk size in bytes (default 32 MiB, §6).
    #[arg(long, default_value_t = ta_engine::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Lease-extension interval the task processors request while a message
    /// is in flight.
    #[arg(long, value_parser = parse_seconds, default_value = "30")]
    pub pubsub_lease_extension: Duration,

    /// Explicit cap on concurrent in-flight copy tasks; overrides
    /// `copy-tasks-per-cpu` when set (§5).
    #[arg(long)]
    pub copy_tasks: Option<usize>,

    /// Concurrent copy tasks per available CPU, used when `copy-tasks` is
    /// unset (§5, default 2).
    #[arg(long, default_value_t = ta_engine::DEFAULT_COPY_TASKS_PER_CPU)]
    pub copy_tasks_per_cpu: usize,

    /// Cap on concurrent in-flight delete tasks; `0` uses the built-in
    /// default of 10 (§5).
    #[arg(long, default_value_t = 0)]
    pub delete_tasks: usize,

    /// Read-concurrency cap for the reader pipeline; negative disables the
    /// semaphore gate entirely (§4.1).
    #[arg(long, default_value_t = -1)]
    pub concurrent_read_max: i64,

    /// Prefix source paths with `mount-directory` (containerized deployments
    /// mount the host filesystem under a subdirectory, §6).
    #[arg(long, default_value_t = false)]
    pub enable_directory_prefix: bool,

    /// Mount directory to prefix source paths with when
    /// `enable-directory-prefix` is set (default `/transfer_root`, §6).
    #[arg(long, default_value = "/transfer_root")]
    pub mount_directory: String,

    /// Directory for log files and the agent-update hint file (§4.10).
    #[arg(long, env = "TRANSFER_AGENT_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Log file size in bytes that triggers rotation.
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    pub max_log_size: u64,

    /// Version string stamped into pulse messages.
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    pub version: String,
}

impl Config {
    /// Effective mount directory: empty (no prefixing) unless
    /// `enable-directory-prefix` is set.
    pub fn effective_mount_directory(&self) -> String {
        if self.enable_directory_prefix {
            self.mount_directory.clone()
        } else {
            String::new()
        }
    }
}

fn parse_seconds(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse::<u64>().map(Duration::from_secs)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
