// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::error::StoreError;
use crate::store::LockStore;
use async_trait::async_trait;
use sluice_core::{AcquireOutcome, ExecutionId, HolderId, LockConfig, LockRecord, ReleaseOutcome};
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Wrapper that adds tracing to any LockStore
#[derive(Clone)]
pub struct TracedLockStore<S> {
    inner: S,
}

impl<S> TracedLockStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl<S: LockStore> LockStore for TracedLockStore<S> {
    async fn create(
        &self,
        config: LockConfig,
        ttl: Option<Duration>,
    ) -> Result<LockRecord, StoreError> {
        let span = tracing::info_span!("store.create", lock = %config.name);
        async {
            let limit = config.concurrency_limit;
            let result = self.inner.create(config, ttl).await;
            match &result {
                Ok(record) => tracing::info!(
                    limit,
                    effective_limit = record.config.concurrency_limit,
                    expires_at = ?record.expires_at,
                    "lock ready"
                ),
                Err(e) => tracing::error!(error = %e, "create failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn try_acquire(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        execution_id: &ExecutionId,
    ) -> Result<AcquireOutcome, StoreError> {
        let span = tracing::info_span!(
            "store.try_acquire",
            lock = lock_name,
            holder = %holder_id,
            execution = %execution_id
        );
        async {
            let start = Instant::now();
            let result = self.inner.try_acquire(lock_name, holder_id, execution_id).await;
            let elapsed_ms = elapsed_ms(start);

            match &result {
                Ok(AcquireOutcome::Granted { available, .. }) => {
                    tracing::info!(available, elapsed_ms, "granted")
                }
                Ok(AcquireOutcome::Denied { reason, available }) => {
                    tracing::debug!(%reason, available, elapsed_ms, "denied")
                }
                Ok(AcquireOutcome::AlreadyHeld { holder }) => tracing::warn!(
                    acquired_at = %holder.acquired_at,
                    elapsed_ms,
                    "holder already admitted"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "acquire failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn release(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
    ) -> Result<ReleaseOutcome, StoreError> {
        let span = tracing::info_span!("store.release", lock = lock_name, holder = %holder_id);
        async {
            let start = Instant::now();
            let result = self.inner.release(lock_name, holder_id).await;
            let elapsed_ms = elapsed_ms(start);

            match &result {
                Ok(ReleaseOutcome::Released { available, .. }) => {
                    tracing::info!(available, elapsed_ms, "released")
                }
                Ok(ReleaseOutcome::NotHeld) => tracing::debug!(elapsed_ms, "not held"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "release failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get(&self, lock_name: &str) -> Result<LockRecord, StoreError> {
        let result = self.inner.get(lock_name).await;
        tracing::trace!(
            lock = lock_name,
            holders = result.as_ref().map(|r| r.holder_count).ok(),
            "read"
        );
        result
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list().await
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        let span = tracing::info_span!("store.purge_expired");
        async {
            let result = self.inner.purge_expired().await;
            match &result {
                Ok(0) => tracing::debug!("nothing expired"),
                Ok(purged) => tracing::info!(purged, "purged expired locks"),
                Err(e) => tracing::error!(error = %e, "purge failed"),
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
