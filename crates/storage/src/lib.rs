// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sluice-storage: lock stores for the sluice admission semaphore
//!
//! - [`LockStore`]: the atomic acquire/release contract
//! - [`MemoryLockStore`]: process-local store
//! - [`FileLockStore`]: WAL-backed store shared across processes
//! - [`TracedLockStore`]: logging wrapper for any store

mod error;
mod file;
mod memory;
mod state;
mod store;
mod traced;
mod wal;

#[cfg(any(test, feature = "test-support"))]
mod faulty;

pub use error::StoreError;
pub use file::{FileLockStore, DEFAULT_COMPACT_AFTER, LOCK_FILE_NAME, WAL_FILE_NAME};
pub use memory::MemoryLockStore;
pub use state::{MaterializedLocks, Mutation};
pub use store::LockStore;
pub use traced::TracedLockStore;
pub use wal::{StoreOp, Wal, WalError};

#[cfg(any(test, feature = "test-support"))]
pub use faulty::FaultyLockStore;
