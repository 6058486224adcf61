// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution status adapters used by the reaper

mod command;
mod noop;

pub use command::CommandStatusAdapter;
pub use noop::NoOpStatusAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusAdapter;

use async_trait::async_trait;
use sluice_core::{ExecutionId, ExecutionStatus};
use thiserror::Error;

/// Errors from status queries
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to run status query: {0}")]
    Spawn(String),
    #[error("status query failed ({code}): {stderr}")]
    CommandFailed { code: String, stderr: String },
    #[error("status query timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("status query failed: {0}")]
    Other(String),
}

/// Asks the orchestration engine how an execution is doing
#[async_trait]
pub trait StatusAdapter: Clone + Send + Sync + 'static {
    /// Current status; `Unknown` when the engine does not know the execution
    async fn status(&self, execution_id: &ExecutionId) -> Result<ExecutionStatus, StatusError>;
}

/// Status source picked from configuration: a query command when one is
/// configured, otherwise nothing is known about any execution
#[derive(Clone, Debug)]
pub enum ConfiguredStatusAdapter {
    Command(CommandStatusAdapter),
    NoOp(NoOpStatusAdapter),
}

impl ConfiguredStatusAdapter {
    /// Build from a `[program, args..]` list, empty meaning no query
    pub fn from_argv(argv: &[String]) -> Self {
        match CommandStatusAdapter::from_argv(argv) {
            Some(command) => ConfiguredStatusAdapter::Command(command),
            None => ConfiguredStatusAdapter::NoOp(NoOpStatusAdapter::new()),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, ConfiguredStatusAdapter::NoOp(_))
    }
}

#[async_trait]
impl StatusAdapter for ConfiguredStatusAdapter {
    async fn status(&self, execution_id: &ExecutionId) -> Result<ExecutionStatus, StatusError> {
        match self {
            ConfiguredStatusAdapter::Command(adapter) => adapter.status(execution_id).await,
            ConfiguredStatusAdapter::NoOp(adapter) => adapter.status(execution_id).await,
        }
    }
}
