// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sluice daemon: runs the reaper against a durable lock store

pub mod lifecycle;
pub mod logging;

pub use lifecycle::{startup, Config, DaemonReaper, DaemonState, DaemonStore, LifecycleError};
pub use logging::{setup_logging, write_startup_error, write_startup_marker, STARTUP_MARKER_PREFIX};
