//! `sluice init` specs

use crate::prelude::*;

#[test]
fn init_creates_configured_locks() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice()
        .args(&["init"])
        .passes()
        .stdout_has("textract: limit 2");
    assert!(temp.store_path().join("locks.wal").is_file());
}

#[test]
fn init_creates_ad_hoc_lock() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["init", "--lock", "ocr", "--limit", "5", "--tps", "2"])
        .passes()
        .stdout_has("ocr: limit 5, warmup 2/s");
}

#[test]
fn init_twice_keeps_holders() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "exec-1"])
        .passes();
    temp.sluice()
        .args(&["init"])
        .passes()
        .stdout_has("textract: limit 2 (1 held)");
}

#[test]
fn init_without_locks_fails() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["init"])
        .fails()
        .stderr_has("no locks configured");
}

#[test]
fn init_rejects_invalid_tps() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["init", "--lock", "ocr", "--limit", "5", "--tps", "0"])
        .fails()
        .stderr_has("warmup_tps_limit must be a positive number");
}
