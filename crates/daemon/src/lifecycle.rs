// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use fs2::FileExt;
use sluice_adapters::{ConfiguredStatusAdapter, TracedStatusAdapter};
use sluice_core::{Config as SluiceConfig, ConfigError};
use sluice_engine::Reaper;
use sluice_storage::{FileLockStore, LockStore, StoreError, TracedLockStore};
use thiserror::Error;
use tracing::{info, warn};

/// Store type the daemon sweeps
pub type DaemonStore = TracedLockStore<FileLockStore>;

/// Reaper with concrete adapter types (wrapped with tracing)
pub type DaemonReaper = Reaper<DaemonStore, TracedStatusAdapter<ConfiguredStatusAdapter>>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed configuration file
    pub settings: SluiceConfig,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Load the config file; daemon files live in the store directory
    pub fn load(config_path: &Path) -> Result<Self, LifecycleError> {
        let settings = SluiceConfig::load(config_path)?;
        Ok(Self::for_settings(settings))
    }

    pub fn for_settings(settings: SluiceConfig) -> Self {
        let dir = settings.store.path.clone();
        Self {
            settings,
            lock_path: dir.join("sluiced.pid"),
            log_path: dir.join("sluiced.log"),
        }
    }

    pub fn store_dir(&self) -> &Path {
        &self.settings.store.path
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Sweeper over the store
    pub reaper: DaemonReaper,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Shutdown the daemon gracefully
    pub fn shutdown(&mut self) {
        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "shutting down daemon"
        );

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // Lock file is released when self.lock_file is dropped
        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log path has no parent directory: {0}")]
    NoLogDir(PathBuf),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            cleanup_on_failure(config, &e);
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create store directory (holds lock, log and WAL)
    std::fs::create_dir_all(config.store_dir())?;

    // 2. Acquire lock file FIRST - one reaper per store
    let mut lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Open the store and make sure every configured lock exists
    let settings = &config.settings;
    let store = TracedLockStore::new(FileLockStore::open(
        config.store_dir(),
        settings.store.compact_after,
    )?);
    for lock in &settings.locks {
        store.create(lock.clone(), None).await?;
    }

    // 4. Status adapter (wrapped with tracing for observability)
    let status = ConfiguredStatusAdapter::from_argv(&settings.reaper.status_command);
    if status.is_noop() && settings.reaper.unknown_grace.is_none() {
        warn!("no status_command or unknown_grace configured; the reaper will never reclaim");
    }
    let reaper = Reaper::new(
        store,
        TracedStatusAdapter::new(status),
        settings.reaper.clone(),
    );

    info!(
        store = %config.store_dir().display(),
        locks = settings.locks.len(),
        "daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        reaper,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config, error: &LifecycleError) {
    // Another daemon owns the PID file
    if matches!(error, LifecycleError::LockFailed(_)) {
        return;
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
