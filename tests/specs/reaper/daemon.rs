//! `sluiced` specs

use crate::prelude::*;
use std::time::Duration;

const DAEMON_CONFIG: &str = r#"
[[lock]]
name = "textract"
concurrency_limit = 2

[reaper]
interval = "100ms"
status_command = ["sh", "-c", "echo FAILED", "status"]
"#;

#[test]
fn daemon_reclaims_crashed_holder() {
    let temp = Project::with_config(DAEMON_CONFIG);
    let _daemon = temp.start_daemon();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "crashed"])
        .passes();

    let reclaimed = wait_for(Duration::from_secs(10), || {
        temp.sluice()
            .args(&["status", "textract"])
            .passes()
            .stdout()
            .contains("0/2 held")
    });
    assert!(reclaimed, "daemon did not reclaim the slot");
}

#[test]
fn daemon_writes_pid_and_log() {
    let temp = Project::with_config(DAEMON_CONFIG);
    let _daemon = temp.start_daemon();
    assert!(temp.store_path().join("sluiced.pid").is_file());
    let log = std::fs::read_to_string(temp.store_path().join("sluiced.log")).unwrap();
    assert!(log.contains("--- sluiced: starting (pid: "));
}

#[test]
fn second_daemon_on_same_store_fails() {
    let temp = Project::with_config(DAEMON_CONFIG);
    let _daemon = temp.start_daemon();

    let mut second = assert_cmd::Command::cargo_bin("sluiced").unwrap();
    second
        .arg(temp.path().join("sluice.toml"))
        .timeout(Duration::from_secs(10))
        .assert()
        .failure();

    let log = std::fs::read_to_string(temp.store_path().join("sluiced.log")).unwrap();
    assert!(log.contains("daemon already running?"));
}
