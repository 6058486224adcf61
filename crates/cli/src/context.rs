// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config discovery and store access for CLI commands

use std::path::{Path, PathBuf};

use sluice_core::{Config, CONFIG_FILE_NAME};
use sluice_storage::{FileLockStore, StoreError, TracedLockStore};

use crate::error::CliError;

/// Store type every command talks to
pub type CliStore = TracedLockStore<FileLockStore>;

/// Loaded configuration plus an open store
pub struct Context {
    pub config: Config,
    pub store: CliStore,
}

impl Context {
    /// Resolve the config file and open the store it names.
    ///
    /// `--store` overrides the configured store directory.
    pub fn load(config: Option<PathBuf>, store: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config = match config {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::config_missing(&path.display().to_string()).into());
                }
                Config::load(&path)?
            }
            None => match find_config()? {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            },
        };
        if let Some(dir) = store {
            config.store.path = dir;
        }
        let store = open_store(&config)?;
        Ok(Self { config, store })
    }
}

fn open_store(config: &Config) -> anyhow::Result<CliStore> {
    let store = FileLockStore::open(&config.store.path, config.store.compact_after)
        .map_err(|e| store_error(&config.store.path, e))?;
    Ok(TracedLockStore::new(store))
}

/// Turn a store error into the CLI's user-facing error
pub fn store_error(dir: &Path, e: StoreError) -> anyhow::Error {
    match e {
        StoreError::LockNotFound(name) => CliError::lock_not_found(&name).into(),
        e if e.is_transient() => {
            CliError::store_unavailable(&dir.display().to_string(), &e.to_string()).into()
        }
        e => e.into(),
    }
}

/// Find the config file: `SLUICE_CONFIG`, then the nearest `sluice.toml`
/// in the current directory or its ancestors.
pub fn find_config() -> anyhow::Result<Option<PathBuf>> {
    if let Ok(path) = std::env::var("SLUICE_CONFIG") {
        return Ok(Some(PathBuf::from(path)));
    }
    let cwd = std::env::current_dir()?;
    Ok(find_config_from(&cwd))
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
