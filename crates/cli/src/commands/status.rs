// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice status`: show lock occupancy

use chrono::Utc;
use clap::Args;
use sluice_storage::{LockStore, StoreError};

use crate::context::{store_error, Context};
use crate::output::{print, print_list, LockView, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// Show only this lock
    pub lock: Option<String>,
}

pub async fn handle(args: StatusArgs, ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let now = Utc::now();
    let dir = &ctx.config.store.path;

    if let Some(name) = args.lock {
        let record = ctx.store.get(&name).await.map_err(|e| store_error(dir, e))?;
        print(&LockView::new(&record, now), format);
        return Ok(());
    }

    let names = ctx.store.list().await.map_err(|e| store_error(dir, e))?;
    let mut views = Vec::with_capacity(names.len());
    for name in names {
        match ctx.store.get(&name).await {
            Ok(record) => views.push(LockView::new(&record, now)),
            // Expired between list and get
            Err(StoreError::LockNotFound(_)) => continue,
            Err(e) => return Err(store_error(dir, e)),
        }
    }
    if views.is_empty() && matches!(format, OutputFormat::Text) {
        println!("No locks");
        return Ok(());
    }
    print_list(&views, format);
    Ok(())
}
