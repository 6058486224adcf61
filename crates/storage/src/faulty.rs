// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault-injecting store wrapper for testing

use crate::error::StoreError;
use crate::store::LockStore;
use async_trait::async_trait;
use sluice_core::{AcquireOutcome, ExecutionId, HolderId, LockConfig, LockRecord, ReleaseOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wraps a store and fails calls on demand with `Unavailable`
#[derive(Clone)]
pub struct FaultyLockStore<S> {
    inner: S,
    failures: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl<S> FaultyLockStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failures: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail the next `n` calls
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Total calls seen, failed or not
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, operation: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StoreError::Unavailable(format!("injected fault in {operation}")));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: LockStore> LockStore for FaultyLockStore<S> {
    async fn create(
        &self,
        config: LockConfig,
        ttl: Option<Duration>,
    ) -> Result<LockRecord, StoreError> {
        self.check("create")?;
        self.inner.create(config, ttl).await
    }

    async fn try_acquire(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        execution_id: &ExecutionId,
    ) -> Result<AcquireOutcome, StoreError> {
        self.check("try_acquire")?;
        self.inner.try_acquire(lock_name, holder_id, execution_id).await
    }

    async fn release(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
    ) -> Result<ReleaseOutcome, StoreError> {
        self.check("release")?;
        self.inner.release(lock_name, holder_id).await
    }

    async fn get(&self, lock_name: &str) -> Result<LockRecord, StoreError> {
        self.check("get")?;
        self.inner.get(lock_name).await
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        self.check("list")?;
        self.inner.list().await
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        self.check("purge_expired")?;
        self.inner.purge_expired().await
    }
}

#[cfg(test)]
#[path = "faulty_tests.rs"]
mod tests;
