// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized lock table built from WAL replay
//!
//! Both store implementations keep their records here and decide every
//! mutation through it, so they share one set of conditional-update rules.

use crate::error::StoreError;
use crate::wal::StoreOp;
use chrono::{DateTime, Utc};
use sluice_core::{
    AcquireOutcome, ExecutionId, HolderId, LockConfig, LockRecord, ReleaseOutcome,
};
use std::collections::BTreeMap;
use std::time::Duration;

/// All lock records keyed by name
#[derive(Debug, Default, Clone)]
pub struct MaterializedLocks {
    pub records: BTreeMap<String, LockRecord>,
}

/// A decided change: the operations to persist and the result they produce
#[derive(Debug)]
pub struct Mutation<T> {
    pub ops: Vec<StoreOp>,
    pub outcome: T,
}

impl<T> Mutation<T> {
    /// A result that changes nothing
    pub fn read(outcome: T) -> Self {
        Self {
            ops: Vec::new(),
            outcome,
        }
    }

    pub fn write(op: StoreOp, outcome: T) -> Self {
        Self {
            ops: vec![op],
            outcome,
        }
    }
}

impl MaterializedLocks {
    /// Build state from a sequence of logged operations
    pub fn replay(ops: &[StoreOp]) -> Self {
        let mut state = Self::default();
        for op in ops {
            state.apply(op);
        }
        state
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &StoreOp) {
        match op {
            StoreOp::LockCreate { config, expires_at } => {
                let mut record = LockRecord::new(config.clone());
                record.expires_at = *expires_at;
                self.records.insert(config.name.clone(), record);
            }

            StoreOp::HolderAcquire { lock, holder } => {
                if let Some(record) = self.records.get_mut(lock) {
                    record.apply_granted(holder.clone());
                }
            }

            StoreOp::HolderRelease { lock, holder_id } => {
                if let Some(record) = self.records.get_mut(lock) {
                    record.apply_released(holder_id);
                }
            }

            StoreOp::LockPurge { lock } => {
                self.records.remove(lock);
            }

            StoreOp::LockSnapshot { record } => {
                self.records.insert(record.config.name.clone(), record.clone());
            }
        }
    }

    /// A record that exists and has not expired
    pub fn live(&self, name: &str, now: DateTime<Utc>) -> Result<&LockRecord, StoreError> {
        self.records
            .get(name)
            .filter(|r| !r.is_expired(now))
            .ok_or_else(|| StoreError::LockNotFound(name.to_string()))
    }

    /// Names of records that have not expired
    pub fn live_names(&self, now: DateTime<Utc>) -> Vec<String> {
        self.records
            .values()
            .filter(|r| !r.is_expired(now))
            .map(|r| r.config.name.clone())
            .collect()
    }

    /// Decide a create-if-absent
    pub fn decide_create(
        &self,
        config: LockConfig,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<Mutation<LockRecord>, StoreError> {
        if let Ok(existing) = self.live(&config.name, now) {
            if existing.config != config {
                tracing::warn!(
                    lock = %config.name,
                    "lock exists with different limits; keeping original"
                );
            }
            return Ok(Mutation::read(existing.clone()));
        }

        let expires_at = match ttl {
            Some(ttl) => Some(
                chrono::Duration::from_std(ttl)
                    .ok()
                    .and_then(|d| now.checked_add_signed(d))
                    .ok_or(StoreError::InvalidTtl(ttl))?,
            ),
            None => None,
        };
        let mut record = LockRecord::new(config.clone());
        record.expires_at = expires_at;
        Ok(Mutation::write(StoreOp::LockCreate { config, expires_at }, record))
    }

    /// Decide an acquire; only a grant produces an operation
    pub fn decide_acquire(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        execution_id: &ExecutionId,
        now: DateTime<Utc>,
    ) -> Result<Mutation<AcquireOutcome>, StoreError> {
        let record = self.live(lock_name, now)?;
        let (_, outcome) = record.acquire(holder_id.clone(), execution_id.clone(), now);
        let decided = match &outcome {
            AcquireOutcome::Granted { holder, .. } => {
                let op = StoreOp::HolderAcquire {
                    lock: lock_name.to_string(),
                    holder: holder.clone(),
                };
                Mutation::write(op, outcome)
            }
            AcquireOutcome::Denied { .. } | AcquireOutcome::AlreadyHeld { .. } => {
                Mutation::read(outcome)
            }
        };
        Ok(decided)
    }

    /// Decide a release; only removing a present holder produces an operation
    pub fn decide_release(
        &self,
        lock_name: &str,
        holder_id: &HolderId,
        now: DateTime<Utc>,
    ) -> Result<Mutation<ReleaseOutcome>, StoreError> {
        let record = self.live(lock_name, now)?;
        let (_, outcome) = record.release(holder_id);
        let decided = match &outcome {
            ReleaseOutcome::Released { .. } => {
                let op = StoreOp::HolderRelease {
                    lock: lock_name.to_string(),
                    holder_id: holder_id.clone(),
                };
                Mutation::write(op, outcome)
            }
            ReleaseOutcome::NotHeld => Mutation::read(outcome),
        };
        Ok(decided)
    }

    /// Decide a purge of every expired record
    pub fn decide_purge(&self, now: DateTime<Utc>) -> Mutation<usize> {
        let ops: Vec<StoreOp> = self
            .records
            .values()
            .filter(|r| r.is_expired(now))
            .map(|r| StoreOp::LockPurge {
                lock: r.config.name.clone(),
            })
            .collect();
        let outcome = ops.len();
        Mutation { ops, outcome }
    }

    /// Apply every operation of a decided change, returning its result
    pub fn commit<T>(&mut self, decided: Mutation<T>) -> T {
        for op in &decided.ops {
            self.apply(op);
        }
        decided.outcome
    }

    /// Minimal log reproducing the current state
    pub fn snapshot(&self) -> Vec<StoreOp> {
        self.records
            .values()
            .map(|record| StoreOp::LockSnapshot {
                record: record.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
