// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op status adapter for when no status query is configured.

use super::{StatusAdapter, StatusError};
use async_trait::async_trait;
use sluice_core::{ExecutionId, ExecutionStatus};

/// Status adapter that knows nothing.
///
/// Every execution reports `Unknown`, so the reaper only reclaims holders once
/// an unknown-status grace period is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpStatusAdapter;

impl NoOpStatusAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatusAdapter for NoOpStatusAdapter {
    async fn status(&self, _execution_id: &ExecutionId) -> Result<ExecutionStatus, StatusError> {
        Ok(ExecutionStatus::Unknown)
    }
}
