// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::status::{StatusAdapter, StatusError};
use async_trait::async_trait;
use sluice_core::{ExecutionId, ExecutionStatus};
use tracing::Instrument;

/// Wrapper that adds tracing to any StatusAdapter
#[derive(Clone)]
pub struct TracedStatusAdapter<A> {
    inner: A,
}

impl<A> TracedStatusAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: StatusAdapter> StatusAdapter for TracedStatusAdapter<A> {
    async fn status(&self, execution_id: &ExecutionId) -> Result<ExecutionStatus, StatusError> {
        let span = tracing::info_span!("status.query", execution = %execution_id);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.status(execution_id).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(status) => tracing::debug!(%status, elapsed_ms, "status"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "status query failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
