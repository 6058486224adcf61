// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable lock store shared between processes
//!
//! Every operation holds an exclusive OS lock on `locks.lock` while it replays
//! `locks.wal`, decides the change and appends it. Two processes pointed at the
//! same directory therefore see one serial history.

use crate::error::StoreError;
use crate::state::{MaterializedLocks, Mutation};
use crate::store::LockStore;
use crate::wal::Wal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use sluice_core::{
    AcquireOutcome, Clock, ExecutionId, HolderId, LockConfig, LockRecord, ReleaseOutcome,
    SystemClock,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// WAL file name inside the store directory
pub const WAL_FILE_NAME: &str = "locks.wal";
/// Lock file name inside the store directory
pub const LOCK_FILE_NAME: &str = "locks.lock";
/// WAL entries tolerated before compaction
pub const DEFAULT_COMPACT_AFTER: u64 = 10_000;

/// Lock store backed by a write-ahead log in a directory
#[derive(Clone)]
pub struct FileLockStore<C: Clock = SystemClock> {
    dir: PathBuf,
    compact_after: u64,
    clock: C,
}

impl FileLockStore<SystemClock> {
    /// Open (creating if needed) a store in `dir`
    pub fn open(dir: impl AsRef<Path>, compact_after: u64) -> Result<Self, StoreError> {
        Self::with_clock(dir, compact_after, SystemClock)
    }
}

impl<C: Clock> FileLockStore<C> {
    pub fn with_clock(dir: impl AsRef<Path>, compact_after: u64, clock: C) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            compact_after: compact_after.max(1),
            clock,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run one locked read-decide-append cycle on a blocking thread
    async fn locked<T, F>(&self, decide: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&MaterializedLocks, DateTime<Utc>) -> Result<Mutation<T>, StoreError>
            + Send
            + 'static,
    {
        let dir = self.dir.clone();
        let compact_after = self.compact_after;
        let clock = self.clock.clone();

        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let lock_file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(dir.join(LOCK_FILE_NAME))?;
            lock_file.lock_exclusive()?;
            let now = clock.now();

            let result = apply_locked(&dir, compact_after, now, decide);

            if let Err(e) = lock_file.unlock() {
                tracing::warn!(error = %e, "failed to unlock store");
            }
            result
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn apply_locked<T, F>(
    dir: &Path,
    compact_after: u64,
    now: DateTime<Utc>,
    decide: F,
) -> Result<T, StoreError>
where
    F: FnOnce(&MaterializedLocks, DateTime<Utc>) -> Result<Mutation<T>, StoreError>,
{
    let (mut wal, ops) = Wal::open(&dir.join(WAL_FILE_NAME))?;
    let mut state = MaterializedLocks::replay(&ops);

    let decided = decide(&state, now)?;
    for op in &decided.ops {
        wal.append(op)?;
    }
    let outcome = state.commit(decided);

    if wal.sequence() > compact_after {
        let snapshot = state.snapshot();
        tracing::info!(
            entries = wal.sequence(),
            records = snapshot.len(),
            "compacting lock WAL"
        );
        wal.rewrite(&snapshot)?;
    }

    Ok(outcome)
}

#[async_trait]
impl<C: Clock> LockStore for FileLockStore<C> {
    async fn create(
        &self,
        config: LockConfig,
        ttl: Option<Duration>,
    ) -> Result<LockRecord, StoreError> {
        self.locked(move |state, now| state.decide_create(config, ttl, now))
            .await
    }

    async fn try_acquire(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        execution_id: &ExecutionId,
    ) -> Result<AcquireOutcome, StoreError> {
        let lock_name = lock_name.to_string();
        let holder_id = holder_id.clone();
        let execution_id = execution_id.clone();
        self.locked(move |state, now| {
            state.decide_acquire(&lock_name, &holder_id, &execution_id, now)
        })
        .await
    }

    async fn release(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
    ) -> Result<ReleaseOutcome, StoreError> {
        let lock_name = lock_name.to_string();
        let holder_id = holder_id.clone();
        self.locked(move |state, now| state.decide_release(&lock_name, &holder_id, now))
            .await
    }

    async fn get(&self, lock_name: &str) -> Result<LockRecord, StoreError> {
        let lock_name = lock_name.to_string();
        self.locked(move |state, now| Ok(Mutation::read(state.live(&lock_name, now)?.clone())))
            .await
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        self.locked(|state, now| Ok(Mutation::read(state.live_names(now))))
            .await
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        self.locked(|state, now| Ok(state.decide_purge(now))).await
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
