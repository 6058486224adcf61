// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice run`: run a command only while holding a slot

use std::process::{ExitCode, ExitStatus};
use std::time::Duration;

use clap::Args;
use sluice_core::Attempt;
use sluice_engine::{AdmissionError, Gate, GateError, GateOutcome};
use tokio::process::Command;

use super::acquire::{attempt_for, wait_policy};
use super::{parse_duration, retry_later, EXIT_WORK_TIMEOUT};
use crate::context::{store_error, Context};

#[derive(Args)]
pub struct RunArgs {
    /// Lock name
    pub lock: String,
    /// Execution that will own the slot
    #[arg(long)]
    pub execution: String,
    /// Holder id (defaults to the execution id)
    #[arg(long)]
    pub holder: Option<String>,
    /// Wait for a slot with backoff instead of exiting on the first denial
    #[arg(long)]
    pub wait: bool,
    /// Give up waiting for a slot after this long
    #[arg(long, requires = "wait", value_parser = parse_duration)]
    pub timeout: Option<Duration>,
    /// Kill the command if it runs longer than this (not counting the wait)
    #[arg(long, value_parser = parse_duration)]
    pub work_timeout: Option<Duration>,
    /// Command and arguments
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}

fn child(attempt: &Attempt, argv: &[String]) -> anyhow::Result<Command> {
    let Some((program, args)) = argv.split_first() else {
        anyhow::bail!("no command given");
    };
    let mut cmd = Command::new(program);
    cmd.args(args)
        .env("SLUICE_LOCK", &attempt.lock_name)
        .env("SLUICE_HOLDER", attempt.holder_id.as_str())
        .env("SLUICE_EXECUTION", attempt.execution_id.as_str())
        .kill_on_drop(true);
    Ok(cmd)
}

/// Exit code is 75 when not admitted, otherwise the command's own
pub async fn handle(args: RunArgs, ctx: &Context) -> anyhow::Result<ExitCode> {
    let mut attempt = attempt_for(&args.lock, args.execution, args.holder);

    let mut gate = Gate::new(ctx.store.clone());
    if let Some(limit) = args.work_timeout.or(ctx.config.gate.work_timeout) {
        gate = gate.with_work_timeout(limit);
    }
    if let Some(deadline) = ctx.config.gate.queue_timeout {
        gate = gate.with_deadline(deadline);
    }
    if args.wait {
        gate = gate.with_wait(wait_policy(args.timeout, ctx));
    }

    let mut cmd = child(&attempt, &args.command)?;
    let result = gate
        .run(&mut attempt, move || async move { cmd.status().await })
        .await;

    match result {
        Ok(GateOutcome::Completed(status)) => Ok(exit_code(status)),
        Ok(GateOutcome::RetryLater { denials }) => {
            eprintln!(
                "denied: no slot on {} ({} denials), retry later",
                args.lock, denials
            );
            Ok(retry_later())
        }
        Err(GateError::Work(e)) => {
            Err(anyhow::Error::new(e).context(format!("failed to run {}", args.command[0])))
        }
        Err(GateError::Timeout(limit)) => {
            eprintln!("killed: command exceeded {}s", limit.as_secs());
            Ok(ExitCode::from(EXIT_WORK_TIMEOUT))
        }
        Err(GateError::Admission(AdmissionError::Store(e))) => {
            Err(store_error(&ctx.config.store.path, e))
        }
        Err(e) => Err(e.into()),
    }
}
