//! Error display specs

use crate::prelude::*;

#[test]
fn unknown_lock_suggests_init() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice()
        .args(&["acquire", "missing", "--execution", "exec-1"])
        .fails()
        .stderr_has("error: Lock 'missing' not found")
        .stderr_has("sluice init --lock missing --limit <N>");
}

#[test]
fn missing_explicit_config_is_reported() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["--config", "nope.toml", "status"])
        .fails()
        .stderr_has("Config file 'nope.toml' not found");
}

#[test]
fn invalid_config_is_reported() {
    let temp = Project::with_config("[[lock]]\nname = \"textract\"\nconcurrency_limit = 0\n");
    temp.sluice()
        .args(&["status"])
        .fails()
        .stderr_has("concurrency_limit must be positive");
}

#[test]
fn run_without_command_is_a_usage_error() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice()
        .args(&["run", "textract", "--execution", "exec-1"])
        .exits(2);
}
