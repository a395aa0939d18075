// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transfer agent daemon library: configuration, logging setup, and the
//! process runtime that assembles a [`ta_engine::Agent`] and drives it to
//! graceful shutdown.
//!
//! Concrete `ObjectStoreAdapter`/`PubSubAdapter` implementations for a real
//! cloud backend are outside this crate's scope (ta-adapters documents the
//! same boundary); `main` wires the in-memory fakes so the binary is
//! runnable standalone, and embedders link against [`run`] directly with
//! their own adapters.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::info;

use ta_adapters::{ObjectStoreAdapter, PubSubAdapter};
use ta_core::AgentIdentity;
use ta_engine::{Agent, AgentUpdateWriter, RateAdmission, Stats, Topics, WiringConfig};

pub use config::Config;

/// Assemble and run one agent process until a shutdown signal arrives or
/// `cancel` is triggered externally, then wait for every subsystem loop to
/// exit (§5: "signal handlers cancel [the root context]").
pub async fn run(
    config: Config,
    pub_sub: Arc<dyn PubSubAdapter>,
    store: Arc<dyn ObjectStoreAdapter>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let identity = AgentIdentity::resolve(config.hostname_override.clone(), config.agent_id_prefix.clone(), None);
    let stats = Stats::spawn();
    let admission = RateAdmission::new(config.concurrent_read_max, stats.clone());
    let update_writer = AgentUpdateWriter::new(&config.log_dir, identity.process_id);
    let topics = Topics::new(&config.pubsub_prefix, &identity);

    info!(
        host = %identity.host_name,
        pid = identity.process_id,
        control_subscription = %topics.control_subscription,
        "agent identity resolved"
    );

    let wiring = WiringConfig {
        pubsub_prefix: config.pubsub_prefix.clone(),
        chunk_size: config.chunk_size,
        copy_tasks: config.copy_tasks,
        copy_tasks_per_cpu: config.copy_tasks_per_cpu,
        delete_tasks: config.delete_tasks,
        concurrent_read_max: config.concurrent_read_max,
        mount_directory: config.effective_mount_directory(),
        logs_dir: config.log_dir.display().to_string(),
        version: config.version.clone(),
        pulse_interval: ta_engine::DEFAULT_PULSE_INTERVAL,
        pubsub_lease_extension: config.pubsub_lease_extension,
    };

    let agent = Agent {
        topics,
        config: wiring,
        pub_sub,
        store,
        admission,
        stats,
        identity,
        update_writer,
    };

    let handles = agent.spawn(cancel.clone());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
        _ = cancel.cancelled() => info!("shutdown requested"),
    }
    cancel.cancel();

    for handle in handles {
        let _ = handle.await;
    }

    info!("agent stopped");
    Ok(())
}

/// Set up a stderr + rolling-file tracing subscriber (§7: ambient logging).
pub fn setup_logging(log_dir: &std::path::Path) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "transfer-agent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(guard)
}
