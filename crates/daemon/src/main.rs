// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sluice daemon (sluiced)
//!
//! Background process that sweeps the lock store for slots held by
//! executions that ended without releasing them.

use std::path::PathBuf;

use sluice_core::CONFIG_FILE_NAME;
use sluice_daemon::{
    setup_logging, startup, write_startup_error, write_startup_marker, Config,
};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?.join(CONFIG_FILE_NAME),
    };

    // Load configuration
    let config = Config::load(&config_path)?;

    // Write startup marker to log (before tracing setup)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting sluiced with config: {}", config_path.display());

    // Start daemon
    let mut daemon = match startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reaper = daemon.reaper.clone();
    let sweeper = tokio::spawn(async move { reaper.run(shutdown_rx).await });

    // Signal ready for parent process (e.g., systemd)
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        error!("Reaper task failed: {}", e);
    }
    daemon.shutdown();

    info!("Daemon stopped");
    Ok(())
}
