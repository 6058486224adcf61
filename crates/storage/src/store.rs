// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lock store contract

use crate::error::StoreError;
use async_trait::async_trait;
use sluice_core::{AcquireOutcome, ExecutionId, HolderId, LockConfig, LockRecord, ReleaseOutcome};
use std::time::Duration;

/// Durable table of named semaphores.
///
/// Every mutating method is a single atomic conditional update: the holder
/// count can never exceed the limit and a denied acquire leaves no trace.
#[async_trait]
pub trait LockStore: Clone + Send + Sync + 'static {
    /// Create a lock if it does not exist (or has expired). An existing record
    /// keeps its original limits.
    async fn create(
        &self,
        config: LockConfig,
        ttl: Option<Duration>,
    ) -> Result<LockRecord, StoreError>;

    /// Take a slot iff the count is below the limit and the throttle allows
    async fn try_acquire(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        execution_id: &ExecutionId,
    ) -> Result<AcquireOutcome, StoreError>;

    /// Return a slot; a no-op if the holder is absent
    async fn release(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
    ) -> Result<ReleaseOutcome, StoreError>;

    /// Point read of a lock record
    async fn get(&self, lock_name: &str) -> Result<LockRecord, StoreError>;

    /// Names of all live locks
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Drop records whose TTL has passed, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, StoreError>;
}
