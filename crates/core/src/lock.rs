// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock record state machine for multi-holder admission control
//!
//! One [`LockRecord`] exists per named semaphore. All changes go through the
//! pure [`LockRecord::transition`] function; stores apply it inside a single
//! critical section and persist only the transitions that changed state.

use crate::clock::elapsed_between;
use crate::id::{ExecutionId, HolderId};
use crate::throttle::{Throttle, DEFAULT_THROTTLE_WINDOW};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::time::Duration;

/// Lock configuration, fixed at creation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Name identifying this lock
    pub name: String,
    /// Maximum simultaneous holders
    pub concurrency_limit: u32,
    /// Maximum new admissions per second (absent for unlimited)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_tps_limit: Option<f64>,
    /// Trailing window over which the TPS limit is enforced
    #[serde(with = "humantime_serde", default = "default_throttle_window")]
    pub throttle_window: Duration,
}

fn default_throttle_window() -> Duration {
    DEFAULT_THROTTLE_WINDOW
}

impl LockConfig {
    pub fn new(name: impl Into<String>, concurrency_limit: u32) -> Self {
        Self {
            name: name.into(),
            concurrency_limit,
            warmup_tps_limit: None,
            throttle_window: DEFAULT_THROTTLE_WINDOW,
        }
    }

    pub fn with_warmup_tps_limit(mut self, tps: f64) -> Self {
        self.warmup_tps_limit = Some(tps);
        self
    }

    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle_window = window;
        self
    }

    pub fn throttle(&self) -> Throttle {
        Throttle::new(self.warmup_tps_limit, self.throttle_window)
    }
}

/// An admitted occupant of one slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub holder_id: HolderId,
    /// Execution the reaper checks to decide whether the holder is still alive
    pub execution_id: ExecutionId,
    pub acquired_at: DateTime<Utc>,
}

impl Holder {
    /// How long this holder has occupied its slot
    pub fn held_for(&self, now: DateTime<Utc>) -> Duration {
        elapsed_between(self.acquired_at, now)
    }
}

/// Persisted state of one named semaphore
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockRecord {
    pub config: LockConfig,
    pub holder_count: u32,
    pub holders: BTreeMap<HolderId, Holder>,
    /// Recent admission instants, oldest first
    #[serde(default)]
    pub recent_acquisitions: VecDeque<DateTime<Utc>>,
    /// Lazy garbage-collection marker for auxiliary lock shards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Inputs that drive lock record transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LockInput {
    /// Take a slot for a holder
    Acquire {
        holder_id: HolderId,
        execution_id: ExecutionId,
    },
    /// Give back a holder's slot
    Release { holder_id: HolderId },
}

/// Why an acquisition was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Every slot is occupied
    Capacity,
    /// Admission rate budget for the current window is spent
    Throttle,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::Capacity => write!(f, "capacity"),
            DenyReason::Throttle => write!(f, "throttle"),
        }
    }
}

/// Result of an atomic acquire
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// Slot taken
    Granted { holder: Holder, available: u32 },
    /// No state change; caller retries later
    Denied { reason: DenyReason, available: u32 },
    /// The holder already occupies a slot; nothing was counted
    AlreadyHeld { holder: Holder },
}

impl AcquireOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, AcquireOutcome::Granted { .. })
    }
}

/// Result of an atomic release; both variants are success
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Slot returned
    Released { holder: Holder, available: u32 },
    /// Holder was already gone (retried release, or lost a race with the reaper)
    NotHeld,
}

/// Result of applying a [`LockInput`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LockOutcome {
    Acquire(AcquireOutcome),
    Release(ReleaseOutcome),
}

impl LockOutcome {
    /// Whether the outcome changed the record and must be persisted
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            LockOutcome::Acquire(AcquireOutcome::Granted { .. })
                | LockOutcome::Release(ReleaseOutcome::Released { .. })
        )
    }
}

impl LockRecord {
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            holder_count: 0,
            holders: BTreeMap::new(),
            recent_acquisitions: VecDeque::new(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Slots still free
    pub fn available(&self) -> u32 {
        self.config.concurrency_limit.saturating_sub(self.holder_count)
    }

    pub fn is_held_by(&self, holder_id: &HolderId) -> bool {
        self.holders.contains_key(holder_id)
    }

    /// Whether the record's TTL has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Count matches the holder set and stays within the limit
    pub fn is_consistent(&self) -> bool {
        self.holder_count as usize == self.holders.len()
            && self.holder_count <= self.config.concurrency_limit
    }

    /// Pure state transition function
    pub fn transition(&self, input: LockInput, now: DateTime<Utc>) -> (LockRecord, LockOutcome) {
        match input {
            LockInput::Acquire {
                holder_id,
                execution_id,
            } => {
                let (next, outcome) = self.acquire(holder_id, execution_id, now);
                (next, LockOutcome::Acquire(outcome))
            }
            LockInput::Release { holder_id } => {
                let (next, outcome) = self.release(&holder_id);
                (next, LockOutcome::Release(outcome))
            }
        }
    }

    /// Take a slot iff one is free and the throttle allows it
    pub fn acquire(
        &self,
        holder_id: HolderId,
        execution_id: ExecutionId,
        now: DateTime<Utc>,
    ) -> (LockRecord, AcquireOutcome) {
        if let Some(existing) = self.holders.get(&holder_id) {
            let holder = existing.clone();
            return (self.clone(), AcquireOutcome::AlreadyHeld { holder });
        }

        let mut next = self.clone();
        let throttle = next.config.throttle();
        throttle.prune(&mut next.recent_acquisitions, now);

        if next.holder_count >= next.config.concurrency_limit {
            let outcome = AcquireOutcome::Denied {
                reason: DenyReason::Capacity,
                available: 0,
            };
            return (next, outcome);
        }
        if !throttle.allows(&next.recent_acquisitions, now) {
            let outcome = AcquireOutcome::Denied {
                reason: DenyReason::Throttle,
                available: next.available(),
            };
            return (next, outcome);
        }

        let holder = Holder {
            holder_id: holder_id.clone(),
            execution_id,
            acquired_at: now,
        };
        next.holders.insert(holder_id, holder.clone());
        next.holder_count += 1;
        throttle.record(&mut next.recent_acquisitions, now);

        let available = next.available();
        (next, AcquireOutcome::Granted { holder, available })
    }

    /// Return a holder's slot; a no-op if the holder is absent
    pub fn release(&self, holder_id: &HolderId) -> (LockRecord, ReleaseOutcome) {
        let mut next = self.clone();
        match next.holders.remove(holder_id) {
            Some(holder) => {
                next.holder_count = next.holder_count.saturating_sub(1);
                let available = next.available();
                (next, ReleaseOutcome::Released { holder, available })
            }
            None => (next, ReleaseOutcome::NotHeld),
        }
    }

    /// Re-apply a previously granted admission (log replay)
    pub fn apply_granted(&mut self, holder: Holder) {
        let throttle = self.config.throttle();
        throttle.record(&mut self.recent_acquisitions, holder.acquired_at);
        if self.holders.insert(holder.holder_id.clone(), holder).is_none() {
            self.holder_count += 1;
        }
    }

    /// Re-apply a previously recorded release (log replay)
    pub fn apply_released(&mut self, holder_id: &HolderId) {
        if self.holders.remove(holder_id).is_some() {
            self.holder_count = self.holder_count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
