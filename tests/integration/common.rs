//! Shared helpers for the integration suite.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// `tile-harness` with a clean Ops Manager environment and no colors.
pub fn tile_harness() -> Command {
    let mut cmd = Command::cargo_bin("tile-harness").unwrap();
    cmd.env_remove("OM_USERNAME")
        .env_remove("OM_PASSWORD")
        .env_remove("OM_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Sets a complete Ops Manager environment on `cmd`.
pub fn with_om_env(cmd: &mut Command) -> &mut Command {
    cmd.env("OM_USERNAME", "admin")
        .env("OM_PASSWORD", "password")
        .env("OM_URL", "https://opsman.example.com")
}

/// Writes an executable `om` script into `dir` that appends its arguments
/// to `om.log` and answers like Ops Manager would for a staged `p-redis`.
///
/// `stage_fails` makes `stage-product` exit 1 with `boom` on stderr.
#[cfg(unix)]
pub fn install_fake_om(dir: &Path, stage_fails: bool) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("om.log");
    let stage = if stage_fails {
        "echo boom >&2; exit 1"
    } else {
        "exit 0"
    };
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{log}"
case "$*" in
  *revert-staged-changes*) exit 0 ;;
  *configure-product*) exit 0 ;;
  *stage-product*) {stage} ;;
  */manifest*) echo '{{"manifest": {{"name": "p-redis", "instance_groups": [{{"name": "redis"}}]}}}}' ;;
  */api/v0/staged/products*) echo '[{{"guid": "cf-1", "type": "cf"}}, {{"guid": "redis-1", "type": "p-redis"}}]' ;;
  *) echo "unexpected: $*" >&2; exit 2 ;;
esac
"#,
        log = log.display(),
    );

    let path = dir.join("om");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    log
}

/// `PATH` with `dir` searched first.
pub fn path_with(dir: &Path) -> String {
    match std::env::var("PATH") {
        Ok(path) => format!("{}:{}", dir.display(), path),
        Err(_) => dir.display().to_string(),
    }
}

/// Writes a product config and its documents into `dir`, returning the
/// config file path.
pub fn write_product(dir: &Path) -> PathBuf {
    fs::write(
        dir.join("properties.json"),
        r#"{".properties.a": {"value": 1}, ".properties.b": {"value": 2}}"#,
    )
    .unwrap();
    fs::write(dir.join("network.json"), r#"{"network": {"name": "services"}}"#).unwrap();

    let config = dir.join("tile.toml");
    fs::write(
        &config,
        r#"[product]
name = "p-redis"
version = "1.0.0"
properties_file = "properties.json"
network_config_file = "network.json"
"#,
    )
    .unwrap();
    config
}
