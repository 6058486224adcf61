// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake status adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StatusAdapter, StatusError};
use async_trait::async_trait;
use sluice_core::{ExecutionId, ExecutionStatus};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Fake status adapter; executions default to `Unknown`
#[derive(Clone, Default)]
pub struct FakeStatusAdapter {
    statuses: Arc<Mutex<HashMap<ExecutionId, ExecutionStatus>>>,
    failing: Arc<Mutex<HashSet<ExecutionId>>>,
    calls: Arc<Mutex<Vec<ExecutionId>>>,
}

impl FakeStatusAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status reported for an execution
    pub fn set_status(&self, execution_id: &ExecutionId, status: ExecutionStatus) {
        self.statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(execution_id.clone(), status);
    }

    /// Make queries for an execution fail
    pub fn set_failing(&self, execution_id: &ExecutionId) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(execution_id.clone());
    }

    /// Executions queried so far, in order
    pub fn calls(&self) -> Vec<ExecutionId> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl StatusAdapter for FakeStatusAdapter {
    async fn status(&self, execution_id: &ExecutionId) -> Result<ExecutionStatus, StatusError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(execution_id.clone());

        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(execution_id)
        {
            return Err(StatusError::Other(format!(
                "injected failure for {execution_id}"
            )));
        }

        Ok(self
            .statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(execution_id)
            .copied()
            .unwrap_or(ExecutionStatus::Unknown))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
