// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice reap`: one reaper sweep, in the foreground

use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use sluice_adapters::{ConfiguredStatusAdapter, TracedStatusAdapter};
use sluice_engine::Reaper;

use super::parse_duration;
use crate::context::Context;
use crate::output::{print, OutputFormat, SweepView};

#[derive(Args)]
pub struct ReapArgs {
    /// Sweep only these locks (repeatable)
    #[arg(long = "lock")]
    pub locks: Vec<String>,
    /// Reclaim holders whose status stays unknown for longer than this
    #[arg(long, value_parser = parse_duration)]
    pub unknown_grace: Option<Duration>,
}

/// Exits non-zero when any holder or lock could not be checked
pub async fn handle(args: ReapArgs, ctx: &Context, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let mut config = ctx.config.reaper.clone();
    if !args.locks.is_empty() {
        config = config.with_locks(args.locks);
    }
    if let Some(grace) = args.unknown_grace {
        config = config.with_unknown_grace(grace);
    }

    let status = ConfiguredStatusAdapter::from_argv(&config.status_command);
    if status.is_noop() && config.unknown_grace.is_none() {
        tracing::warn!("no status_command or unknown_grace configured; nothing can be reclaimed");
    }
    let reaper = Reaper::new(ctx.store.clone(), TracedStatusAdapter::new(status), config);

    let report = reaper.sweep().await;
    print(&SweepView::from(&report), format);
    if report.errors > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
