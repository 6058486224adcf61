//! `sluice run` specs

use crate::prelude::*;

fn project() -> Project {
    let temp = Project::with_config(TWO_SLOTS);
    temp.sluice().args(&["init"]).passes();
    temp
}

#[test]
fn run_passes_through_exit_code_and_releases() {
    let temp = project();
    temp.sluice()
        .args(&["run", "textract", "--execution", "a", "--", "sh", "-c", "exit 3"])
        .exits(3);
    temp.sluice()
        .args(&["status", "textract"])
        .passes()
        .stdout_has("0/2 held");
}

#[test]
fn run_sees_holder_in_environment() {
    let temp = project();
    temp.sluice()
        .args(&[
            "run", "textract", "--execution", "exec-9", "--", "sh", "-c",
            "echo $SLUICE_LOCK $SLUICE_HOLDER",
        ])
        .passes()
        .stdout_has("textract exec-9");
}

#[test]
fn run_holds_slot_while_command_runs() {
    let temp = project();
    temp.sluice()
        .args(&["run", "textract", "--execution", "a", "--", "sluice", "status", "textract"])
        .env("PATH", path_with_sluice())
        .passes()
        .stdout_has("1/2 held");
}

#[test]
fn run_denied_exits_75_without_running() {
    let temp = project();
    for exec in ["a", "b"] {
        temp.sluice()
            .args(&["acquire", "textract", "--execution", exec])
            .passes();
    }
    temp.sluice()
        .args(&["run", "textract", "--execution", "c", "--", "sh", "-c", "echo ran"])
        .exits(EXIT_RETRY_LATER)
        .stdout_lacks("ran")
        .stderr_has("retry later");
}

#[test]
fn run_work_timeout_kills_and_releases() {
    let temp = project();
    temp.sluice()
        .args(&[
            "run", "textract", "--execution", "a", "--work-timeout", "200ms", "--", "sleep", "10",
        ])
        .exits(124)
        .stderr_has("killed");
    temp.sluice()
        .args(&["status", "textract"])
        .passes()
        .stdout_has("0/2 held");
}

#[test]
fn run_missing_program_fails_and_releases() {
    let temp = project();
    temp.sluice()
        .args(&["run", "textract", "--execution", "a", "--", "definitely-not-a-program"])
        .fails()
        .stderr_has("failed to run definitely-not-a-program");
    temp.sluice()
        .args(&["status", "textract"])
        .passes()
        .stdout_has("0/2 held");
}

fn path_with_sluice() -> String {
    let bin = assert_cmd::cargo::cargo_bin("sluice");
    let dir = bin.parent().unwrap().display().to_string();
    match std::env::var("PATH") {
        Ok(path) => format!("{dir}:{path}"),
        Err(_) => dir,
    }
}
