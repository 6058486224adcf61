//! `sluice status` specs

use crate::prelude::*;

#[test]
fn status_with_empty_store() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["status"])
        .passes()
        .stdout_eq("No locks\n");
}

#[test]
fn status_lists_holders() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "exec-7"])
        .passes();
    temp.sluice()
        .args(&["status"])
        .passes()
        .stdout_has("textract: 1/2 held, 1 available")
        .stdout_has("exec-7");
}

#[test]
fn status_of_one_lock_as_json() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    let out = temp
        .sluice()
        .args(&["-o", "json", "status", "textract"])
        .passes();
    let json = out.json();
    assert_eq!(json["name"], "textract");
    assert_eq!(json["concurrency_limit"], 2);
    assert_eq!(json["holders"].as_array().unwrap().len(), 0);
}

#[test]
fn store_flag_points_at_another_store() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["--store", "other", "status"])
        .passes()
        .stdout_eq("No locks\n");
}

#[test]
fn expired_shard_is_hidden() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["init", "--lock", "shard-1", "--limit", "1", "--ttl", "100ms"])
        .passes();
    std::thread::sleep(std::time::Duration::from_millis(200));
    temp.sluice()
        .args(&["status"])
        .passes()
        .stdout_eq("No locks\n");
}
