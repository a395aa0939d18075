// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transfer agent binary entry point.
//!
//! This binary wires the in-memory fake object-store and pub/sub adapters
//! (§6: "Process surface (abstract)" treats the bus and store as external
//! collaborators); an embedder that needs a real cloud backend links
//! `ta_daemon::run` directly with its own `ObjectStoreAdapter`/`PubSubAdapter`
//! implementations instead of this binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ta_adapters::{FakeObjectStore, FakePubSub, ObjectStoreAdapter, PubSubAdapter};
use ta_daemon::Config;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    rotate_log_if_needed(&config.log_dir.join("transfer-agent.log"), config.max_log_size);
    let _log_guard = match ta_daemon::setup_logging(&config.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: failed to set up logging: {e}");
            std::process::exit(1);
        }
    };

    info!(
        project_id = %config.project_id,
        credentials_path = %config.credentials_path.display(),
        version = %config.version,
        "starting transfer agent"
    );
    warn!("no production object-store/pub-sub backend is wired into this binary; using in-memory fakes");

    let pub_sub: Arc<dyn PubSubAdapter> = Arc::new(FakePubSub::new());
    let store: Arc<dyn ObjectStoreAdapter> = Arc::new(FakeObjectStore::new());

    if let Err(e) = ta_daemon::run(config, pub_sub, store, CancellationToken::new()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Maximum rotated log files kept alongside the active one.
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate `transfer-agent.log` if it exceeds `max_size` bytes, shifting
/// `.log` → `.log.1` → `.log.2` → `.log.3`, dropping the oldest.
/// Best-effort: rotation failures do not block startup.
fn rotate_log_if_needed(log_path: &std::path::Path, max_size: u64) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < max_size {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
