// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice init`: create locks in the store

use std::fmt;
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use sluice_core::config::validate_lock;
use sluice_core::{LockConfig, LockRecord};
use sluice_storage::LockStore;

use super::parse_duration;
use crate::context::{store_error, Context};
use crate::output::{print_list, OutputFormat};

#[derive(Args)]
pub struct InitArgs {
    /// Create this lock instead of the ones listed in the config file
    #[arg(long, requires = "limit")]
    pub lock: Option<String>,
    /// Maximum simultaneous holders
    #[arg(long)]
    pub limit: Option<u32>,
    /// Maximum new admissions per second
    #[arg(long)]
    pub tps: Option<f64>,
    /// Window the admission rate is measured over
    #[arg(long, value_parser = parse_duration)]
    pub window: Option<Duration>,
    /// Expire the lock after this long (auxiliary shards)
    #[arg(long, value_parser = parse_duration)]
    pub ttl: Option<Duration>,
}

#[derive(Serialize)]
struct Created {
    name: String,
    concurrency_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    warmup_tps_limit: Option<f64>,
    holder_count: u32,
}

impl Created {
    fn new(record: &LockRecord) -> Self {
        Self {
            name: record.config.name.clone(),
            concurrency_limit: record.config.concurrency_limit,
            warmup_tps_limit: record.config.warmup_tps_limit,
            holder_count: record.holder_count,
        }
    }
}

impl fmt::Display for Created {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: limit {}", self.name, self.concurrency_limit)?;
        if let Some(tps) = self.warmup_tps_limit {
            write!(f, ", warmup {}/s", tps)?;
        }
        if self.holder_count > 0 {
            write!(f, " ({} held)", self.holder_count)?;
        }
        Ok(())
    }
}

fn requested_locks(args: &InitArgs, ctx: &Context) -> anyhow::Result<Vec<LockConfig>> {
    let (Some(name), Some(limit)) = (&args.lock, args.limit) else {
        if ctx.config.locks.is_empty() {
            anyhow::bail!("no locks configured; pass --lock <NAME> --limit <N> or add [[lock]] to sluice.toml");
        }
        return Ok(ctx.config.locks.clone());
    };
    let mut config = LockConfig::new(name.clone(), limit);
    if let Some(tps) = args.tps {
        config = config.with_warmup_tps_limit(tps);
    }
    if let Some(window) = args.window {
        config = config.with_throttle_window(window);
    }
    validate_lock(&config)?;
    Ok(vec![config])
}

/// Create each lock if absent; existing locks keep their limits and holders
pub async fn handle(args: InitArgs, ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let locks = requested_locks(&args, ctx)?;
    let mut created = Vec::with_capacity(locks.len());
    for config in locks {
        let record = ctx
            .store
            .create(config, args.ttl)
            .await
            .map_err(|e| store_error(&ctx.config.store.path, e))?;
        created.push(Created::new(&record));
    }
    print_list(&created, format);
    Ok(())
}
