// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller side of the admission protocol
//!
//! Drives an [`Attempt`] through its state machine against a [`LockStore`].
//! Acquire never blocks: a denial is returned at once and waiting is the
//! caller's business, either through its own retries or [`RetryPolicy`].

use crate::error::AdmissionError;
use crate::retry::RetryPolicy;
use sluice_core::{AcquireOutcome, Attempt, AttemptEvent, ReleaseOutcome};
use sluice_storage::LockStore;
use tokio::time::Instant;

/// Admission client for one store
#[derive(Clone)]
pub struct Admission<S> {
    store: S,
}

impl<S: LockStore> Admission<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ask for a slot once.
    ///
    /// On a store failure the attempt returns to idle and the error is
    /// returned; whether a slot was taken is unknown.
    pub async fn request(&self, attempt: &mut Attempt) -> Result<AcquireOutcome, AdmissionError> {
        *attempt = attempt.transition(AttemptEvent::Request)?;

        let result = self
            .store
            .try_acquire(&attempt.lock_name, &attempt.holder_id, &attempt.execution_id)
            .await;

        let (event, outcome) = match result {
            Ok(outcome) => {
                let event = match &outcome {
                    AcquireOutcome::Granted { holder, .. } => AttemptEvent::Granted {
                        at: holder.acquired_at,
                    },
                    AcquireOutcome::AlreadyHeld { holder } => AttemptEvent::AlreadyHeld {
                        since: holder.acquired_at,
                    },
                    AcquireOutcome::Denied { .. } => AttemptEvent::Denied,
                };
                (event, Ok(outcome))
            }
            Err(e) => (AttemptEvent::StoreUnavailable, Err(AdmissionError::Store(e))),
        };

        *attempt = attempt.transition(event)?;
        if let Ok(AcquireOutcome::Denied { reason, available }) = &outcome {
            tracing::debug!(
                lock = %attempt.lock_name,
                holder = %attempt.holder_id,
                %reason,
                available,
                denials = attempt.denials,
                "admission denied"
            );
        }
        outcome
    }

    /// Ask for a slot until admitted or the policy's deadline passes.
    ///
    /// Denials and transient store failures are retried with backoff; other
    /// store errors are returned immediately.
    pub async fn request_with_retry(
        &self,
        attempt: &mut Attempt,
        policy: &RetryPolicy,
    ) -> Result<AcquireOutcome, AdmissionError> {
        let start = Instant::now();
        let mut retry = 0u32;

        loop {
            match self.request(attempt).await {
                Ok(AcquireOutcome::Denied { .. }) => {}
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(lock = %attempt.lock_name, error = %e, "acquire failed, retrying");
                }
                Err(e) => return Err(e),
            }

            let waited = start.elapsed();
            let Some(delay) = policy.next_delay(retry, waited) else {
                return Err(AdmissionError::DeadlineExceeded {
                    lock: attempt.lock_name.clone(),
                    waited,
                    denials: attempt.denials,
                });
            };
            tokio::time::sleep(delay).await;
            retry = retry.saturating_add(1);
        }
    }

    /// Return the attempt's slot.
    ///
    /// A holder the store no longer has (already released, or reclaimed by the
    /// reaper) is `NotHeld`, which is still success. On a store failure the
    /// attempt stays admitted and the reaper is left to recover the slot.
    pub async fn release(&self, attempt: &mut Attempt) -> Result<ReleaseOutcome, AdmissionError> {
        let released = attempt.transition(AttemptEvent::Released)?;
        let result = self
            .store
            .release(&attempt.lock_name, &attempt.holder_id)
            .await;

        match result {
            Ok(outcome) => {
                *attempt = released;
                if outcome == ReleaseOutcome::NotHeld {
                    tracing::info!(
                        lock = %attempt.lock_name,
                        holder = %attempt.holder_id,
                        "slot was already returned"
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                *attempt = attempt.transition(AttemptEvent::StoreUnavailable)?;
                Err(AdmissionError::Store(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
