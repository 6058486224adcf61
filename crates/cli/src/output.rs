// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use sluice_core::{Holder, LockRecord};
use sluice_engine::SweepReport;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

fn format_age(held_for: std::time::Duration) -> String {
    let secs = std::time::Duration::from_secs(held_for.as_secs());
    humantime::format_duration(secs).to_string()
}

/// A holder as shown to operators
#[derive(Debug, Serialize)]
pub struct HolderView {
    pub holder_id: String,
    pub execution_id: String,
    pub acquired_at: DateTime<Utc>,
    pub held_secs: u64,
}

impl HolderView {
    pub fn new(holder: &Holder, now: DateTime<Utc>) -> Self {
        Self {
            holder_id: holder.holder_id.to_string(),
            execution_id: holder.execution_id.to_string(),
            acquired_at: holder.acquired_at,
            held_secs: holder.held_for(now).as_secs(),
        }
    }
}

/// A lock record as shown to operators
#[derive(Debug, Serialize)]
pub struct LockView {
    pub name: String,
    pub concurrency_limit: u32,
    pub holder_count: u32,
    pub available: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_tps_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub holders: Vec<HolderView>,
}

impl LockView {
    pub fn new(record: &LockRecord, now: DateTime<Utc>) -> Self {
        Self {
            name: record.config.name.clone(),
            concurrency_limit: record.config.concurrency_limit,
            holder_count: record.holder_count,
            available: record.available(),
            warmup_tps_limit: record.config.warmup_tps_limit,
            expires_at: record.expires_at,
            holders: record
                .holders
                .values()
                .map(|h| HolderView::new(h, now))
                .collect(),
        }
    }
}

impl fmt::Display for LockView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} held, {} available",
            self.name, self.holder_count, self.concurrency_limit, self.available
        )?;
        if let Some(tps) = self.warmup_tps_limit {
            write!(f, ", warmup {}/s", tps)?;
        }
        if let Some(at) = self.expires_at {
            write!(f, ", expires {}", at.to_rfc3339())?;
        }
        for holder in &self.holders {
            write!(
                f,
                "\n  {:<36} {:<36} {}",
                holder.holder_id,
                holder.execution_id,
                format_age(std::time::Duration::from_secs(holder.held_secs))
            )?;
        }
        Ok(())
    }
}

/// Sweep counts as shown to operators
#[derive(Debug, Serialize)]
pub struct SweepView {
    pub locks: usize,
    pub holders: usize,
    pub reclaimed: usize,
    pub race_lost: usize,
    pub running: usize,
    pub unknown: usize,
    pub purged: usize,
    pub errors: usize,
}

impl From<&SweepReport> for SweepView {
    fn from(report: &SweepReport) -> Self {
        Self {
            locks: report.locks,
            holders: report.holders,
            reclaimed: report.reclaimed,
            race_lost: report.race_lost,
            running: report.running,
            unknown: report.unknown,
            purged: report.purged,
            errors: report.errors,
        }
    }
}

impl fmt::Display for SweepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "swept {} locks, {} holders: {} reclaimed, {} running, {} unknown, {} already released, {} expired purged, {} errors",
            self.locks,
            self.holders,
            self.reclaimed,
            self.running,
            self.unknown,
            self.race_lost,
            self.purged,
            self.errors
        )
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
