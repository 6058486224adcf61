// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for admission and gated work

use sluice_core::AttemptError;
use sluice_storage::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors from the caller side of the admission protocol
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error("no slot on {lock} after {waited:?} ({denials} denials)")]
    DeadlineExceeded {
        lock: String,
        waited: Duration,
        denials: u32,
    },
}

impl AdmissionError {
    /// Whether the host should retry the whole attempt later
    pub fn is_retryable(&self) -> bool {
        match self {
            AdmissionError::Store(e) => e.is_transient(),
            AdmissionError::DeadlineExceeded { .. } => true,
            AdmissionError::Attempt(_) => false,
        }
    }
}

/// Errors from running work behind the gate
#[derive(Debug, Error)]
pub enum GateError<E> {
    #[error("admission failed: {0}")]
    Admission(#[from] AdmissionError),
    #[error("work failed: {0}")]
    Work(E),
    #[error("work timed out after {0:?}")]
    Timeout(Duration),
    #[error("work was cancelled")]
    Cancelled,
}
