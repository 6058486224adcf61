// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission attempt state machine
//!
//! Tracks one logical attempt from the caller's side:
//! `Idle -> Requesting -> {Admitted, Denied}`, with `Denied -> Requesting` on
//! re-invocation and `Admitted -> Released` once the slot is returned.

use crate::id::{ExecutionId, HolderId};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Caller-side state of an admission attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptState {
    /// Not yet asked, or the last request ended with the store unreachable
    Idle,
    /// Acquire in flight
    Requesting,
    /// Holding a slot
    Admitted { since: DateTime<Utc> },
    /// Refused; waiting to be re-invoked by the host
    Denied,
    /// Slot returned
    Released,
}

impl AttemptState {
    fn label(&self) -> &'static str {
        match self {
            AttemptState::Idle => "idle",
            AttemptState::Requesting => "requesting",
            AttemptState::Admitted { .. } => "admitted",
            AttemptState::Denied => "denied",
            AttemptState::Released => "released",
        }
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Events that move an attempt between states
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptEvent {
    /// Start an acquire request
    Request,
    /// Store granted a slot
    Granted { at: DateTime<Utc> },
    /// Store reported the holder already occupies a slot
    AlreadyHeld { since: DateTime<Utc> },
    /// Store refused for capacity or throttle
    Denied,
    /// Store could not be reached; slot state unknown
    StoreUnavailable,
    /// Slot returned to the store
    Released,
}

impl AttemptEvent {
    fn label(&self) -> &'static str {
        match self {
            AttemptEvent::Request => "request",
            AttemptEvent::Granted { .. } => "granted",
            AttemptEvent::AlreadyHeld { .. } => "already_held",
            AttemptEvent::Denied => "denied",
            AttemptEvent::StoreUnavailable => "store_unavailable",
            AttemptEvent::Released => "released",
        }
    }
}

/// Event not valid in the attempt's current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid attempt transition: {event} while {from}")]
pub struct AttemptError {
    pub from: &'static str,
    pub event: &'static str,
}

/// One logical admission attempt against a named lock
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub lock_name: String,
    pub holder_id: HolderId,
    pub execution_id: ExecutionId,
    pub state: AttemptState,
    /// Times this attempt has been refused
    pub denials: u32,
}

impl Attempt {
    pub fn new(lock_name: impl Into<String>, holder_id: HolderId, execution_id: ExecutionId) -> Self {
        Self {
            lock_name: lock_name.into(),
            holder_id,
            execution_id,
            state: AttemptState::Idle,
            denials: 0,
        }
    }

    /// Attempt whose holder identity is the execution id itself
    pub fn for_execution(lock_name: impl Into<String>, execution_id: ExecutionId) -> Self {
        let holder_id = HolderId::for_execution(&execution_id);
        Self::new(lock_name, holder_id, execution_id)
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self.state, AttemptState::Admitted { .. })
    }

    /// Pure transition function
    pub fn transition(&self, event: AttemptEvent) -> Result<Attempt, AttemptError> {
        let state = match (&self.state, &event) {
            (AttemptState::Idle | AttemptState::Denied, AttemptEvent::Request) => {
                AttemptState::Requesting
            }
            (AttemptState::Requesting, AttemptEvent::Granted { at }) => {
                AttemptState::Admitted { since: *at }
            }
            (AttemptState::Requesting, AttemptEvent::AlreadyHeld { since }) => {
                AttemptState::Admitted { since: *since }
            }
            (AttemptState::Requesting, AttemptEvent::Denied) => {
                return Ok(Attempt {
                    state: AttemptState::Denied,
                    denials: self.denials + 1,
                    ..self.clone()
                });
            }
            (AttemptState::Requesting, AttemptEvent::StoreUnavailable) => AttemptState::Idle,
            (AttemptState::Admitted { .. }, AttemptEvent::Released) => AttemptState::Released,
            // A failed release leaves the slot held; the reaper recovers it
            (AttemptState::Admitted { since }, AttemptEvent::StoreUnavailable) => {
                AttemptState::Admitted { since: *since }
            }
            (from, event) => {
                return Err(AttemptError {
                    from: from.label(),
                    event: event.label(),
                })
            }
        };

        Ok(Attempt {
            state,
            ..self.clone()
        })
    }
}

#[cfg(test)]
#[path = "attempt_tests.rs"]
mod tests;
