// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Acquire-before, release-after wrapper around a unit of work
//!
//! The work runs on its own task so a panic is caught, the slot is returned,
//! and the panic then continues in the caller.

use crate::admission::Admission;
use crate::error::{AdmissionError, GateError};
use crate::retry::RetryPolicy;
use sluice_core::{AcquireOutcome, Attempt, GateConfig};
use sluice_storage::LockStore;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;

/// Result of running work behind the gate
#[derive(Debug, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// Admitted; the work ran to completion
    Completed(T),
    /// Not admitted; the host should invoke the attempt again later
    RetryLater { denials: u32 },
}

impl<T> GateOutcome<T> {
    pub fn is_retry_later(&self) -> bool {
        matches!(self, GateOutcome::RetryLater { .. })
    }
}

enum WorkEnd<T, E> {
    Finished(Result<T, E>),
    TimedOut(Duration),
    Joined(JoinError),
}

/// Runs work only while holding a slot
#[derive(Clone)]
pub struct Gate<S> {
    admission: Admission<S>,
    work_timeout: Option<Duration>,
    deadline: Option<Duration>,
    wait: Option<RetryPolicy>,
}

impl<S: LockStore> Gate<S> {
    pub fn new(store: S) -> Self {
        Self {
            admission: Admission::new(store),
            work_timeout: None,
            deadline: None,
            wait: None,
        }
    }

    /// Gate with the work and queue timeouts from configuration
    pub fn from_config(store: S, config: &GateConfig) -> Self {
        let mut gate = Self::new(store);
        gate.work_timeout = config.work_timeout;
        if let Some(queue_timeout) = config.queue_timeout {
            gate.deadline = Some(queue_timeout);
            gate.wait = Some(RetryPolicy::new().with_deadline(queue_timeout));
        }
        gate
    }

    /// Limit the work itself, excluding time spent waiting for a slot
    pub fn with_work_timeout(mut self, timeout: Duration) -> Self {
        self.work_timeout = Some(timeout);
        self
    }

    /// Bound the whole call: waiting for a slot plus the work
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Wait for a slot with backoff instead of returning at the first denial
    pub fn with_wait(mut self, policy: RetryPolicy) -> Self {
        self.wait = Some(policy);
        self
    }

    pub fn admission(&self) -> &Admission<S> {
        &self.admission
    }

    /// Acquire, run `work`, and release on every exit path.
    ///
    /// A denial is `RetryLater`, not an error. A failure to release after the
    /// work is logged and left to the reaper; the work's own result wins.
    pub async fn run<F, Fut, T, E>(
        &self,
        attempt: &mut Attempt,
        work: F,
    ) -> Result<GateOutcome<T>, GateError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let started = tokio::time::Instant::now();
        let admitted = match &self.wait {
            Some(policy) => match self.admission.request_with_retry(attempt, policy).await {
                Err(AdmissionError::DeadlineExceeded { denials, .. }) => {
                    return Ok(GateOutcome::RetryLater { denials });
                }
                result => result?,
            },
            None => self.admission.request(attempt).await?,
        };
        if let AcquireOutcome::Denied { .. } = admitted {
            return Ok(GateOutcome::RetryLater {
                denials: attempt.denials,
            });
        }

        let remaining = self
            .deadline
            .map(|deadline| deadline.saturating_sub(started.elapsed()));
        let limit = match (self.work_timeout, remaining) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let end = run_work(work(), limit).await;

        if let Err(e) = self.admission.release(attempt).await {
            tracing::warn!(
                lock = %attempt.lock_name,
                holder = %attempt.holder_id,
                error = %e,
                "release after work failed; slot left for the reaper"
            );
        }

        match end {
            WorkEnd::Finished(Ok(value)) => Ok(GateOutcome::Completed(value)),
            WorkEnd::Finished(Err(e)) => Err(GateError::Work(e)),
            WorkEnd::TimedOut(limit) => Err(GateError::Timeout(limit)),
            WorkEnd::Joined(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            WorkEnd::Joined(_) => Err(GateError::Cancelled),
        }
    }
}

/// Run the work on its own task; a timed-out task is aborted and awaited so
/// it has stopped before the slot is released
async fn run_work<Fut, T, E>(work: Fut, limit: Option<Duration>) -> WorkEnd<T, E>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let mut handle = tokio::spawn(work);
    let joined = match limit {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                if let Err(e) = handle.await {
                    if e.is_panic() {
                        tracing::warn!("work panicked while being cancelled at its timeout");
                    }
                }
                return WorkEnd::TimedOut(limit);
            }
        },
        None => handle.await,
    };
    match joined {
        Ok(result) => WorkEnd::Finished(result),
        Err(e) => WorkEnd::Joined(e),
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
