// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reclaims slots held by executions that ended without releasing
//!
//! Each sweep asks the orchestration engine about every holder and releases
//! the ones whose execution has finished. A holder whose status is unknown is
//! kept: reclaiming a live holder would let the lock exceed its real limit.

use sluice_adapters::StatusAdapter;
use sluice_core::{Clock, ExecutionStatus, Holder, ReaperConfig, ReleaseOutcome, SystemClock};
use sluice_storage::LockStore;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

/// What a sweep decided about one holder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Reclaim,
    KeepRunning,
    KeepUnknown,
}

/// Decide a holder's fate from its execution status
pub fn verdict(status: ExecutionStatus, held_for: Duration, unknown_grace: Option<Duration>) -> Verdict {
    match status {
        s if s.is_terminal() => Verdict::Reclaim,
        ExecutionStatus::Unknown => match unknown_grace {
            Some(grace) if held_for > grace => Verdict::Reclaim,
            _ => Verdict::KeepUnknown,
        },
        _ => Verdict::KeepRunning,
    }
}

/// Counts from one sweep
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub locks: usize,
    pub holders: usize,
    pub reclaimed: usize,
    /// Reclaims that found the holder already released
    pub race_lost: usize,
    pub running: usize,
    pub unknown: usize,
    /// Expired lock shards removed
    pub purged: usize,
    pub errors: usize,
}

/// Periodic sweeper over a store
#[derive(Clone)]
pub struct Reaper<S, A, C: Clock = SystemClock> {
    store: S,
    status: A,
    clock: C,
    config: ReaperConfig,
}

impl<S: LockStore, A: StatusAdapter> Reaper<S, A, SystemClock> {
    pub fn new(store: S, status: A, config: ReaperConfig) -> Self {
        Self::with_clock(store, status, config, SystemClock)
    }
}

impl<S: LockStore, A: StatusAdapter, C: Clock> Reaper<S, A, C> {
    pub fn with_clock(store: S, status: A, config: ReaperConfig, clock: C) -> Self {
        Self {
            store,
            status,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ReaperConfig {
        &self.config
    }

    /// One pass over every configured lock. Errors are counted, never fatal.
    pub async fn sweep(&self) -> SweepReport {
        let span = tracing::info_span!("reaper.sweep");
        async {
            let mut report = SweepReport::default();

            let names = if self.config.locks.is_empty() {
                match self.store.list().await {
                    Ok(names) => names,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to list locks");
                        report.errors += 1;
                        Vec::new()
                    }
                }
            } else {
                self.config.locks.clone()
            };

            for name in &names {
                self.sweep_lock(name, &mut report).await;
            }

            match self.store.purge_expired().await {
                Ok(purged) => report.purged = purged,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to purge expired locks");
                    report.errors += 1;
                }
            }

            if report.reclaimed > 0 || report.errors > 0 {
                tracing::info!(?report, "sweep finished");
            } else {
                tracing::debug!(?report, "sweep finished");
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn sweep_lock(&self, name: &str, report: &mut SweepReport) {
        let record = match self.store.get(name).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(lock = name, error = %e, "failed to read lock");
                report.errors += 1;
                return;
            }
        };
        report.locks += 1;

        let now = self.clock.now();
        for holder in record.holders.values() {
            report.holders += 1;
            let status = match self.status.status(&holder.execution_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(
                        lock = name,
                        holder = %holder.holder_id,
                        error = %e,
                        "status query failed; holder kept"
                    );
                    report.errors += 1;
                    continue;
                }
            };

            match verdict(status, holder.held_for(now), self.config.unknown_grace) {
                Verdict::Reclaim => self.reclaim(name, holder, status, report).await,
                Verdict::KeepRunning => report.running += 1,
                Verdict::KeepUnknown => {
                    tracing::debug!(
                        lock = name,
                        holder = %holder.holder_id,
                        "status unknown; holder kept"
                    );
                    report.unknown += 1;
                }
            }
        }
    }

    async fn reclaim(
        &self,
        name: &str,
        holder: &Holder,
        status: ExecutionStatus,
        report: &mut SweepReport,
    ) {
        match self.store.release(name, &holder.holder_id).await {
            Ok(ReleaseOutcome::Released { available, .. }) => {
                tracing::info!(
                    lock = name,
                    holder = %holder.holder_id,
                    execution = %holder.execution_id,
                    %status,
                    available,
                    "reclaimed slot"
                );
                report.reclaimed += 1;
            }
            Ok(ReleaseOutcome::NotHeld) => {
                tracing::info!(
                    lock = name,
                    holder = %holder.holder_id,
                    "holder released before reclaim"
                );
                report.race_lost += 1;
            }
            Err(e) => {
                tracing::error!(
                    lock = name,
                    holder = %holder.holder_id,
                    error = %e,
                    "reclaim failed"
                );
                report.errors += 1;
            }
        }
    }

    /// Sweep every interval until `shutdown` turns true or its sender drops
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.config.interval;
        tracing::info!(interval_ms = interval.as_millis() as u64, "reaper started");

        while !*shutdown.borrow() {
            // Shutdown interrupts a sweep; each reclaim is a single store call
            tokio::select! {
                _ = self.sweep() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("reaper stopped");
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
