//! `sluice acquire` specs

use crate::prelude::*;

fn project() -> Project {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp
}

#[test]
fn acquire_grants_until_capacity_then_denies() {
    let temp = project();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "a"])
        .passes()
        .stdout_has("granted: a on textract (1 available)");
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "b"])
        .passes()
        .stdout_has("(0 available)");
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "c"])
        .exits(EXIT_RETRY_LATER)
        .stdout_has("denied: capacity on textract");
}

#[test]
fn acquire_again_by_same_holder_is_not_counted_twice() {
    let temp = project();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "a"])
        .passes();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "a"])
        .passes()
        .stdout_has("already held: a on textract");
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "b"])
        .passes()
        .stdout_has("granted");
}

#[test]
fn acquire_with_explicit_holder() {
    let temp = project();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "exec-1", "--holder", "exec-1/try-2"])
        .passes()
        .stdout_has("granted: exec-1/try-2");
}

#[test]
fn acquire_json_reports_result() {
    let temp = project();
    let out = temp
        .sluice()
        .args(&["-o", "json", "acquire", "textract", "--execution", "a"])
        .passes();
    let json = out.json();
    assert_eq!(json["result"], "granted");
    assert_eq!(json["available"], 1);
}

#[test]
fn acquire_wait_gives_up_at_timeout() {
    let temp = project();
    for exec in ["a", "b"] {
        temp.sluice()
            .args(&["acquire", "textract", "--execution", exec])
            .passes();
    }
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "c", "--wait", "--timeout", "300ms"])
        .exits(EXIT_RETRY_LATER)
        .stderr_has("no slot on textract");
}

#[test]
fn throttle_denies_burst_beyond_rate() {
    let temp = Project::with_config(
        "[[lock]]\nname = \"warm\"\nconcurrency_limit = 10\nwarmup_tps_limit = 0.01\n",
    );
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["acquire", "warm", "--execution", "a"])
        .passes();
    temp.sluice()
        .args(&["acquire", "warm", "--execution", "b"])
        .exits(EXIT_RETRY_LATER)
        .stdout_has("denied: throttle on warm");
}
