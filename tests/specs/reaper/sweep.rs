//! `sluice reap` specs

use crate::prelude::*;

const STATUS_FAILED: &str = r#"
[[lock]]
name = "textract"
concurrency_limit = 2

[reaper]
status_command = ["sh", "-c", "echo FAILED", "status"]
"#;

const STATUS_RUNNING: &str = r#"
[[lock]]
name = "textract"
concurrency_limit = 2

[reaper]
status_command = ["sh", "-c", "echo RUNNING", "status"]
"#;

fn hold_one(temp: &Project) {
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "crashed"])
        .passes();
}

#[test]
fn reap_reclaims_failed_execution() {
    let temp = Project::with_config(STATUS_FAILED);
    hold_one(&temp);
    temp.sluice()
        .args(&["reap"])
        .passes()
        .stdout_has("1 reclaimed");
    temp.sluice()
        .args(&["status", "textract"])
        .passes()
        .stdout_has("0/2 held");
}

#[test]
fn reap_keeps_running_execution() {
    let temp = Project::with_config(STATUS_RUNNING);
    hold_one(&temp);
    temp.sluice()
        .args(&["reap"])
        .passes()
        .stdout_has("0 reclaimed, 1 running");
}

#[test]
fn reap_never_reclaims_unknown_by_default() {
    let temp = Project::with_config(TWO_SLOTS);
    hold_one(&temp);
    temp.sluice()
        .args(&["reap"])
        .passes()
        .stdout_has("0 reclaimed, 0 running, 1 unknown");
}

#[test]
fn reap_unknown_grace_reclaims_old_holders() {
    let temp = Project::with_config(TWO_SLOTS);
    hold_one(&temp);
    std::thread::sleep(std::time::Duration::from_millis(1100));
    temp.sluice()
        .args(&["reap", "--unknown-grace", "1s"])
        .passes()
        .stdout_has("1 reclaimed");
}

#[test]
fn reap_reports_status_errors() {
    let temp = Project::with_config(
        "[[lock]]\nname = \"textract\"\nconcurrency_limit = 2\n\n[reaper]\nstatus_command = [\"false\"]\n",
    );
    hold_one(&temp);
    temp.sluice()
        .args(&["reap"])
        .fails()
        .stdout_has("1 errors");
}

#[test]
fn reap_json_counts() {
    let temp = Project::with_config(STATUS_FAILED);
    hold_one(&temp);
    let out = temp.sluice().args(&["-o", "json", "reap"]).passes();
    let json = out.json();
    assert_eq!(json["reclaimed"], 1);
    assert_eq!(json["holders"], 1);
}
