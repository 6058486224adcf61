// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status adapter that shells out to a query program

use super::{StatusAdapter, StatusError};
use async_trait::async_trait;
use sluice_core::{ExecutionId, ExecutionStatus};
use std::time::Duration;
use tokio::process::Command;

/// Default limit on a single status query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs `program [args..] <execution-id>` and reads the status from stdout
#[derive(Clone, Debug)]
pub struct CommandStatusAdapter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandStatusAdapter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Build from a `[program, args..]` list; `None` if the list is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// First non-empty stdout line, parsed leniently
fn parse_status(stdout: &str) -> ExecutionStatus {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ExecutionStatus::parse_lenient)
        .unwrap_or(ExecutionStatus::Unknown)
}

#[async_trait]
impl StatusAdapter for CommandStatusAdapter {
    async fn status(&self, execution_id: &ExecutionId) -> Result<ExecutionStatus, StatusError> {
        let query = Command::new(&self.program)
            .args(&self.args)
            .arg(execution_id.as_str())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| StatusError::Timeout(self.timeout))?
            .map_err(|e| StatusError::Spawn(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(StatusError::CommandFailed { code, stderr });
        }

        Ok(parse_status(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
