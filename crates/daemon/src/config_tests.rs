// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use super::Config;

fn parse(extra: &[&str]) -> Config {
    let mut args = vec![
        "transfer-agent",
        "--project-id",
        "proj",
        "--credentials-path",
        "/etc/transfer-agent/creds.json",
        "--log-dir",
        "/var/log/transfer-agent",
    ];
    args.extend_from_slice(extra);
    Config::parse_from(args)
}

#[test]
fn mount_directory_is_disabled_by_default() {
    let config = parse(&[]);
    assert!(!config.enable_directory_prefix);
    assert_eq!(config.effective_mount_directory(), "");
}

#[test]
fn mount_directory_uses_the_configured_path_when_enabled() {
    let config = parse(&["--enable-directory-prefix"]);
    assert_eq!(config.effective_mount_directory(), "/transfer_root");
}

#[test]
fn mount_directory_honors_an_explicit_override() {
    let config = parse(&["--enable-directory-prefix", "--mount-directory", "/mnt/src"]);
    assert_eq!(config.effective_mount_directory(), "/mnt/src");
}

#[test]
fn copy_tasks_defaults_to_unset_in_favor_of_per_cpu_scaling() {
    let config = parse(&[]);
    assert_eq!(config.copy_tasks, None);
    assert_eq!(config.copy_tasks_per_cpu, ta_engine::DEFAULT_COPY_TASKS_PER_CPU);
}

#[test]
fn chunk_size_defaults_to_the_engine_constant() {
    let config = parse(&[]);
    assert_eq!(config.chunk_size, ta_engine::DEFAULT_CHUNK_SIZE);
}
