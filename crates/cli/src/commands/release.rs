// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice release`: give a slot back

use std::fmt;

use clap::Args;
use serde::Serialize;
use sluice_core::{HolderId, ReleaseOutcome};
use sluice_storage::LockStore;

use crate::context::{store_error, Context};
use crate::output::{print, OutputFormat};

#[derive(Args)]
#[command(group(clap::ArgGroup::new("who").required(true).args(["holder", "execution"])))]
pub struct ReleaseArgs {
    /// Lock name
    pub lock: String,
    /// Holder id to release
    #[arg(long)]
    pub holder: Option<String>,
    /// Execution id whose default holder to release
    #[arg(long)]
    pub execution: Option<String>,
}

#[derive(Serialize)]
struct ReleaseView {
    lock: String,
    holder: String,
    released: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<u32>,
}

impl fmt::Display for ReleaseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.available {
            Some(available) => write!(
                f,
                "released: {} on {} ({} available)",
                self.holder, self.lock, available
            ),
            None => write!(f, "not held: {} on {}", self.holder, self.lock),
        }
    }
}

/// Release is idempotent: a holder that is already gone is still success
pub async fn handle(args: ReleaseArgs, ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let holder_id = match (args.holder, args.execution) {
        (Some(holder), _) => HolderId::new(holder),
        (None, Some(execution)) => HolderId::new(execution),
        (None, None) => anyhow::bail!("--holder or --execution is required"),
    };

    let outcome = ctx
        .store
        .release(&args.lock, &holder_id)
        .await
        .map_err(|e| store_error(&ctx.config.store.path, e))?;

    let available = match outcome {
        ReleaseOutcome::Released { available, .. } => Some(available),
        ReleaseOutcome::NotHeld => None,
    };
    let view = ReleaseView {
        lock: args.lock,
        holder: holder_id.to_string(),
        released: available.is_some(),
        available,
    };
    print(&view, format);
    Ok(())
}
