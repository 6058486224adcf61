// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local lock store

use crate::error::StoreError;
use crate::state::MaterializedLocks;
use crate::store::LockStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sluice_core::{
    AcquireOutcome, Clock, ExecutionId, HolderId, LockConfig, LockRecord, ReleaseOutcome,
    SystemClock,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Lock store held in memory; every operation is one critical section
#[derive(Clone)]
pub struct MemoryLockStore<C: Clock = SystemClock> {
    state: Arc<Mutex<MaterializedLocks>>,
    clock: C,
}

impl MemoryLockStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryLockStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryLockStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(MaterializedLocks::default())),
            clock,
        }
    }

    /// Run `f` under the lock with the time read after the lock is taken
    fn with_state<T>(&self, f: impl FnOnce(&mut MaterializedLocks, DateTime<Utc>) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();
        f(&mut state, now)
    }
}

#[async_trait]
impl<C: Clock> LockStore for MemoryLockStore<C> {
    async fn create(
        &self,
        config: LockConfig,
        ttl: Option<Duration>,
    ) -> Result<LockRecord, StoreError> {
        self.with_state(|state, now| {
            let decided = state.decide_create(config, ttl, now)?;
            Ok(state.commit(decided))
        })
    }

    async fn try_acquire(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        execution_id: &ExecutionId,
    ) -> Result<AcquireOutcome, StoreError> {
        self.with_state(|state, now| {
            let decided = state.decide_acquire(lock_name, holder_id, execution_id, now)?;
            Ok(state.commit(decided))
        })
    }

    async fn release(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
    ) -> Result<ReleaseOutcome, StoreError> {
        self.with_state(|state, now| {
            let decided = state.decide_release(lock_name, holder_id, now)?;
            Ok(state.commit(decided))
        })
    }

    async fn get(&self, lock_name: &str) -> Result<LockRecord, StoreError> {
        self.with_state(|state, now| state.live(lock_name, now).cloned())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.with_state(|state, now| state.live_names(now)))
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        Ok(self.with_state(|state, now| {
            let decided = state.decide_purge(now);
            state.commit(decided)
        }))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
