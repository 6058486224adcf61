// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

const FULL: &str = r#"
[store]
path = "state"
compact_after = 500

[[lock]]
name = "TextractConcurrencyLock"
concurrency_limit = 90
warmup_tps_limit = 2.0

[[lock]]
name = "slow"
concurrency_limit = 1
warmup_tps_limit = 0.5
throttle_window = "5s"

[reaper]
interval = "10s"
unknown_grace = "30m"
status_command = ["status-of", "--id"]

[gate]
work_timeout = "25m"
queue_timeout = "30m"
"#;

#[test]
fn parses_full_config() {
    let config = Config::from_toml(FULL).unwrap();

    assert_eq!(config.store.path, PathBuf::from("state"));
    assert_eq!(config.store.compact_after, 500);
    assert_eq!(config.locks.len(), 2);

    let lock = config.lock("TextractConcurrencyLock").unwrap();
    assert_eq!(lock.concurrency_limit, 90);
    assert_eq!(lock.warmup_tps_limit, Some(2.0));
    assert_eq!(lock.throttle_window, Duration::from_secs(1));
    assert_eq!(
        config.lock("slow").unwrap().throttle_window,
        Duration::from_secs(5)
    );

    assert_eq!(config.reaper.interval, Duration::from_secs(10));
    assert_eq!(config.reaper.unknown_grace, Some(Duration::from_secs(1800)));
    assert!(config.reaper.locks.is_empty());
    assert_eq!(config.reaper.status_command, vec!["status-of", "--id"]);
    assert_eq!(config.gate.work_timeout, Some(Duration::from_secs(25 * 60)));
}

#[test]
fn empty_config_uses_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.reaper.interval, Duration::from_secs(30));
    assert_eq!(config.reaper.unknown_grace, None);
    assert_eq!(config.store.path, PathBuf::from(".sluice"));
}

#[test]
fn rejects_zero_concurrency_limit() {
    let err = Config::from_toml(
        r#"
[[lock]]
name = "zero"
concurrency_limit = 0
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidLock { ref name, .. } if name == "zero"));
}

#[test]
fn rejects_non_positive_tps() {
    let err = Config::from_toml(
        r#"
[[lock]]
name = "neg"
concurrency_limit = 1
warmup_tps_limit = -1.0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("warmup_tps_limit"));
}

#[test]
fn rejects_duplicate_lock_names() {
    let err = Config::from_toml(
        r#"
[[lock]]
name = "a"
concurrency_limit = 1

[[lock]]
name = "a"
concurrency_limit = 2
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateLock(ref n) if n == "a"));
}

#[test]
fn rejects_unknown_sections() {
    assert!(matches!(
        Config::from_toml("[bogus]\nx = 1\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn load_resolves_store_path_relative_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(FULL.as_bytes()).unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.store.path, dir.path().join("state"));
}

#[test]
fn load_reports_missing_file() {
    let err = Config::load(Path::new("/nonexistent/sluice.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
