//! Shared helpers for CLI specs

use assert_cmd::assert::Assert;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as StdCommand, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Exit code for "denied, retry later"
pub const EXIT_RETRY_LATER: i32 = 75;

/// One lock, two slots, no throttle
pub const TWO_SLOTS: &str = r#"
[[lock]]
name = "textract"
concurrency_limit = 2
"#;

/// A scratch directory the CLI runs in
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Project with a sluice.toml
    pub fn with_config(config: &str) -> Self {
        let project = Self::empty();
        project.file("sluice.toml", config);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Default store directory for a config without `[store]`
    pub fn store_path(&self) -> PathBuf {
        self.path().join(".sluice")
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn sluice(&self) -> CliCommand {
        CliCommand::new("sluice", self.path())
    }

    /// Start `sluiced` against this project's config and wait for READY
    pub fn start_daemon(&self) -> Daemon {
        let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin("sluiced"))
            .arg(self.path().join("sluice.toml"))
            .current_dir(self.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let stdout = child.stdout.take().unwrap();
        let mut line = String::new();
        std::io::BufRead::read_line(&mut std::io::BufReader::new(stdout), &mut line).unwrap();
        assert_eq!(line.trim(), "READY", "daemon did not report ready");
        Daemon { child }
    }
}

/// A running daemon, killed on drop
pub struct Daemon {
    child: Child,
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub struct CliCommand {
    cmd: assert_cmd::Command,
}

impl CliCommand {
    fn new(bin: &str, cwd: &Path) -> Self {
        let mut cmd = assert_cmd::Command::cargo_bin(bin).unwrap();
        cmd.current_dir(cwd)
            .env_remove("SLUICE_CONFIG")
            .env_remove("SLUICE_LOG")
            .timeout(Duration::from_secs(30));
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        RunAssert(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> RunAssert {
        RunAssert(self.cmd.assert().failure())
    }

    pub fn exits(mut self, code: i32) -> RunAssert {
        RunAssert(self.cmd.assert().code(code))
    }
}

pub struct RunAssert(Assert);

impl RunAssert {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(expected)))
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(unexpected).not()))
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        Self(self.0.stdout(expected.to_string()))
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self(self.0.stderr(predicate::str::contains(expected)))
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.0.get_output().stdout).unwrap()
    }
}

/// Poll until `check` holds or the timeout passes
pub fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}
