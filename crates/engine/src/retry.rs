// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-side backoff for hosts without their own retry pool

use std::time::Duration;

/// First delay after a denial
pub const BACKOFF_BASE: Duration = Duration::from_millis(100);
/// Longest delay between attempts
pub const BACKOFF_MAX: Duration = Duration::from_secs(5);

/// Capped exponential backoff with an optional overall deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base: Duration,
    pub max: Duration,
    /// Total time to keep retrying; `None` retries forever
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: BACKOFF_BASE,
            max: BACKOFF_MAX,
            deadline: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.base = base;
        self.max = max.max(base);
        self
    }

    /// Delay before retry number `retry` (zero-based), ignoring the deadline
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.min(31));
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Delay before the next retry, or `None` once the deadline has passed.
    /// The delay is clipped so the last retry lands on the deadline.
    pub fn next_delay(&self, retry: u32, elapsed: Duration) -> Option<Duration> {
        let delay = self.backoff(retry);
        match self.deadline {
            None => Some(delay),
            Some(deadline) if elapsed >= deadline => None,
            Some(deadline) => Some(delay.min(deadline - elapsed)),
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
