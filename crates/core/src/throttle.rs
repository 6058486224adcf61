// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding-window limiter on the rate of new admissions
//!
//! The window is stretched to `1 / rate` when the rate is below one admission
//! per window, so fractional rates still admit one caller per period.

use crate::clock::elapsed_between;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

/// Default trailing window for the warmup throttle
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_secs(1);

/// Sliding-window admission rate limit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throttle {
    /// New admissions per second, `None` for unlimited
    rate: Option<f64>,
    window: Duration,
}

impl Throttle {
    pub fn new(rate: Option<f64>, window: Duration) -> Self {
        Self { rate, window }
    }

    pub fn unlimited() -> Self {
        Self::new(None, DEFAULT_THROTTLE_WINDOW)
    }

    pub fn per_second(rate: f64) -> Self {
        Self::new(Some(rate), DEFAULT_THROTTLE_WINDOW)
    }

    pub fn is_unlimited(&self) -> bool {
        self.rate.is_none()
    }

    /// Window actually used for counting, never shorter than one admission period
    pub fn effective_window(&self) -> Duration {
        match self.rate {
            Some(rate) if rate > 0.0 && rate.is_finite() => {
                let period = Duration::try_from_secs_f64(1.0 / rate).unwrap_or(Duration::MAX);
                self.window.max(period)
            }
            _ => self.window,
        }
    }

    /// Admissions allowed per effective window, `None` for unlimited
    pub fn budget(&self) -> Option<usize> {
        let rate = self.rate?;
        if !(rate > 0.0 && rate.is_finite()) {
            return Some(0);
        }
        let budget = (rate * self.effective_window().as_secs_f64()).floor() as usize;
        Some(budget.max(1))
    }

    /// Whether a new admission at `now` stays within the budget
    pub fn allows(&self, recent: &VecDeque<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match self.budget() {
            None => true,
            Some(budget) => self.count_in_window(recent, now) < budget,
        }
    }

    /// Number of recorded admissions inside the trailing window
    pub fn count_in_window(&self, recent: &VecDeque<DateTime<Utc>>, now: DateTime<Utc>) -> usize {
        let window = self.effective_window();
        recent
            .iter()
            .filter(|ts| elapsed_between(**ts, now) < window)
            .count()
    }

    /// Drop timestamps that have slid out of the window
    pub fn prune(&self, recent: &mut VecDeque<DateTime<Utc>>, now: DateTime<Utc>) {
        let window = self.effective_window();
        recent.retain(|ts| elapsed_between(*ts, now) < window);
    }

    /// Record an admission, keeping at most `budget` entries
    pub fn record(&self, recent: &mut VecDeque<DateTime<Utc>>, now: DateTime<Utc>) {
        let Some(budget) = self.budget() else {
            recent.clear();
            return;
        };
        recent.push_back(now);
        while recent.len() > budget {
            recent.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
