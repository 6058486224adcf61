// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sluice admission engine: caller-side protocol, gated work and the reaper

mod admission;
mod error;
mod gate;
mod reaper;
mod retry;

pub use admission::Admission;
pub use error::{AdmissionError, GateError};
pub use gate::{Gate, GateOutcome};
pub use reaper::{verdict, Reaper, SweepReport, Verdict};
pub use retry::{RetryPolicy, BACKOFF_BASE, BACKOFF_MAX};
