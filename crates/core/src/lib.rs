// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sluice-core: data model for the sluice admission-control semaphore
//!
//! This crate provides:
//! - The lock record and its pure acquire/release state machine
//! - The sliding-window warmup throttle
//! - The caller-side attempt state machine
//! - Execution status as reported by the orchestration engine
//! - TOML configuration

pub mod attempt;
pub mod clock;
pub mod config;
pub mod id;
pub mod lock;
pub mod status;
pub mod throttle;

pub use attempt::{Attempt, AttemptError, AttemptEvent, AttemptState};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, GateConfig, ReaperConfig, StoreConfig, CONFIG_FILE_NAME};
pub use id::{ExecutionId, HolderId};
pub use lock::{
    AcquireOutcome, DenyReason, Holder, LockConfig, LockInput, LockOutcome, LockRecord,
    ReleaseOutcome,
};
pub use status::ExecutionStatus;
pub use throttle::Throttle;
