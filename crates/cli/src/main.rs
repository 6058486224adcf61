// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sluice - distributed admission control CLI

mod commands;
mod context;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{acquire, init, reap, release, run, status};
use tracing_subscriber::EnvFilter;

use crate::context::Context;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "sluice",
    version,
    about = "Sluice - admission control for shared downstream capacity"
)]
struct Cli {
    /// Config file (defaults to the nearest sluice.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store directory, overriding the config file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create locks in the store
    Init(init::InitArgs),
    /// Take a slot (exit 75 when denied)
    Acquire(acquire::AcquireArgs),
    /// Give a slot back
    Release(release::ReleaseArgs),
    /// Show lock occupancy
    Status(status::StatusArgs),
    /// Run a command while holding a slot (exit 75 when denied)
    Run(run::RunArgs),
    /// Reclaim slots held by finished executions
    Reap(reap::ReapArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SLUICE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(cli.config, cli.store)?;
    let format = cli.output;

    match cli.command {
        Commands::Init(args) => init::handle(args, &ctx, format).await?,
        Commands::Acquire(args) => return acquire::handle(args, &ctx, format).await,
        Commands::Release(args) => release::handle(args, &ctx, format).await?,
        Commands::Status(args) => status::handle(args, &ctx, format).await?,
        Commands::Run(args) => return run::handle(args, &ctx).await,
        Commands::Reap(args) => return reap::handle(args, &ctx, format).await,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<error::CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
