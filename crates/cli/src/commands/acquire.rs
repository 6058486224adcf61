// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice acquire`: take a slot for an execution

use std::fmt;
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use sluice_core::{AcquireOutcome, Attempt, ExecutionId, HolderId};
use sluice_engine::{Admission, AdmissionError, RetryPolicy};

use super::{parse_duration, retry_later};
use crate::context::{store_error, Context};
use crate::output::{print, OutputFormat};

#[derive(Args)]
pub struct AcquireArgs {
    /// Lock name
    pub lock: String,
    /// Execution that will own the slot
    #[arg(long)]
    pub execution: String,
    /// Holder id (defaults to the execution id)
    #[arg(long)]
    pub holder: Option<String>,
    /// Keep retrying with backoff instead of exiting on the first denial
    #[arg(long)]
    pub wait: bool,
    /// Give up waiting after this long
    #[arg(long, requires = "wait", value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
enum AcquireView {
    Granted { lock: String, holder: String, available: u32 },
    AlreadyHeld { lock: String, holder: String },
    Denied { lock: String, reason: String, available: u32 },
}

impl AcquireView {
    fn new(lock: &str, outcome: &AcquireOutcome) -> Self {
        let lock = lock.to_string();
        match outcome {
            AcquireOutcome::Granted { holder, available } => AcquireView::Granted {
                lock,
                holder: holder.holder_id.to_string(),
                available: *available,
            },
            AcquireOutcome::AlreadyHeld { holder } => AcquireView::AlreadyHeld {
                lock,
                holder: holder.holder_id.to_string(),
            },
            AcquireOutcome::Denied { reason, available } => AcquireView::Denied {
                lock,
                reason: reason.to_string(),
                available: *available,
            },
        }
    }
}

impl fmt::Display for AcquireView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireView::Granted {
                lock,
                holder,
                available,
            } => write!(f, "granted: {} on {} ({} available)", holder, lock, available),
            AcquireView::AlreadyHeld { lock, holder } => {
                write!(f, "already held: {} on {}", holder, lock)
            }
            AcquireView::Denied {
                lock,
                reason,
                available,
            } => write!(
                f,
                "denied: {} on {} ({} available), retry later",
                reason, lock, available
            ),
        }
    }
}

pub(crate) fn attempt_for(lock: &str, execution: String, holder: Option<String>) -> Attempt {
    let execution_id = ExecutionId::new(execution);
    match holder {
        Some(holder) => Attempt::new(lock, HolderId::new(holder), execution_id),
        None => Attempt::for_execution(lock, execution_id),
    }
}

pub(crate) fn wait_policy(timeout: Option<Duration>, ctx: &Context) -> RetryPolicy {
    match timeout.or(ctx.config.gate.queue_timeout) {
        Some(deadline) => RetryPolicy::new().with_deadline(deadline),
        None => RetryPolicy::new(),
    }
}

pub async fn handle(
    args: AcquireArgs,
    ctx: &Context,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let admission = Admission::new(ctx.store.clone());
    let mut attempt = attempt_for(&args.lock, args.execution, args.holder);

    let result = if args.wait {
        let policy = wait_policy(args.timeout, ctx);
        admission.request_with_retry(&mut attempt, &policy).await
    } else {
        admission.request(&mut attempt).await
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(AdmissionError::DeadlineExceeded {
            lock,
            waited,
            denials,
        }) => {
            eprintln!(
                "no slot on {} after {}s ({} denials), retry later",
                lock,
                waited.as_secs(),
                denials
            );
            return Ok(retry_later());
        }
        Err(AdmissionError::Store(e)) => return Err(store_error(&ctx.config.store.path, e)),
        Err(e) => return Err(e.into()),
    };

    print(&AcquireView::new(&args.lock, &outcome), format);
    match outcome {
        AcquireOutcome::Denied { .. } => Ok(retry_later()),
        _ => Ok(ExitCode::SUCCESS),
    }
}
