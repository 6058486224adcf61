// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock stores

use crate::wal::WalError;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur talking to a lock store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lock not found: {0}")]
    LockNotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
    #[error("store task failed: {0}")]
    Task(String),
    #[error("lock TTL out of range: {0:?}")]
    InvalidTtl(Duration),
}

impl StoreError {
    /// Whether retrying later may succeed. The slot state is unknown after a
    /// transient failure: the caller must not assume granted or not granted.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable(_) | StoreError::Io(_) | StoreError::Task(_) => true,
            StoreError::Wal(WalError::Io(_)) => true,
            StoreError::LockNotFound(_) | StoreError::InvalidTtl(_) | StoreError::Wal(_) => false,
        }
    }
}
