//! `sluice release` specs

use crate::prelude::*;

#[test]
fn release_frees_a_slot() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "a"])
        .passes();
    temp.sluice()
        .args(&["release", "textract", "--execution", "a"])
        .passes()
        .stdout_has("released: a on textract (2 available)");
}

#[test]
fn release_is_idempotent() {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp.sluice()
        .args(&["acquire", "textract", "--execution", "a"])
        .passes();
    temp.sluice()
        .args(&["release", "textract", "--holder", "a"])
        .passes();
    temp.sluice()
        .args(&["release", "textract", "--holder", "a"])
        .passes()
        .stdout_has("not held: a on textract");
}

#[test]
fn release_unknown_lock_fails() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["release", "nope", "--holder", "a"])
        .fails()
        .stderr_has("Lock 'nope' not found");
}
