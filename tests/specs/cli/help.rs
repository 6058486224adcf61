//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let temp = Project::empty();
    let out = temp.sluice().args(&["--help"]).passes();
    for cmd in ["init", "acquire", "release", "status", "run", "reap"] {
        assert!(out.stdout().contains(cmd), "help is missing {cmd}");
    }
}

#[test]
fn run_help_mentions_exit_75() {
    let temp = Project::empty();
    temp.sluice()
        .args(&["--help"])
        .passes()
        .stdout_has("exit 75 when denied");
}
