// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration for stores, locks, the reaper and the gate

use crate::lock::LockConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "sluice.toml";

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lock '{name}': {reason}")]
    InvalidLock { name: String, reason: String },
    #[error("duplicate lock name: {0}")]
    DuplicateLock(String),
    #[error("reaper interval must be non-zero")]
    ZeroInterval,
}

/// Top-level configuration file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default, rename = "lock")]
    pub locks: Vec<LockConfig>,
    #[serde(default)]
    pub reaper: ReaperConfig,
    #[serde(default)]
    pub gate: GateConfig,
}

/// Where and how the durable store keeps its log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Log entries written before the log is compacted
    #[serde(default = "default_compact_after")]
    pub compact_after: u64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".sluice")
}

fn default_compact_after() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            compact_after: default_compact_after(),
        }
    }
}

/// Reaper sweep configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Time between sweeps
    #[serde(with = "humantime_serde", default = "default_reaper_interval")]
    pub interval: Duration,
    /// How long a holder whose status is unknown is tolerated before being
    /// reclaimed; absent means never reclaim on unknown status
    #[serde(with = "humantime_serde", default)]
    pub unknown_grace: Option<Duration>,
    /// Locks to sweep; empty sweeps every lock in the store
    #[serde(default)]
    pub locks: Vec<String>,
    /// Program and leading arguments for the status query; the execution id
    /// is appended as the final argument
    #[serde(default)]
    pub status_command: Vec<String>,
}

fn default_reaper_interval() -> Duration {
    Duration::from_secs(30)
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: default_reaper_interval(),
            unknown_grace: None,
            locks: Vec::new(),
            status_command: Vec::new(),
        }
    }
}

impl ReaperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_unknown_grace(mut self, grace: Duration) -> Self {
        self.unknown_grace = Some(grace);
        self
    }

    pub fn with_locks(mut self, locks: Vec<String>) -> Self {
        self.locks = locks;
        self
    }
}

/// Timeouts for gated work
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Limit on the gated work itself, excluding time spent waiting for a slot
    #[serde(with = "humantime_serde", default)]
    pub work_timeout: Option<Duration>,
    /// Limit on waiting for a slot plus the work
    #[serde(with = "humantime_serde", default)]
    pub queue_timeout: Option<Duration>,
}

impl Config {
    /// Parse and validate configuration text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a relative store path is resolved against the
    /// file's directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if config.store.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.store.path = dir.join(&config.store.path);
            }
        }
        Ok(config)
    }

    pub fn lock(&self, name: &str) -> Option<&LockConfig> {
        self.locks.iter().find(|l| l.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for lock in &self.locks {
            validate_lock(lock)?;
            if !seen.insert(lock.name.as_str()) {
                return Err(ConfigError::DuplicateLock(lock.name.clone()));
            }
        }
        if self.reaper.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// Check the creation-time limits of a lock
pub fn validate_lock(lock: &LockConfig) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidLock {
        name: lock.name.clone(),
        reason: reason.to_string(),
    };

    if lock.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if lock.concurrency_limit == 0 {
        return Err(invalid("concurrency_limit must be positive"));
    }
    if let Some(tps) = lock.warmup_tps_limit {
        if !(tps.is_finite() && tps > 0.0) {
            return Err(invalid("warmup_tps_limit must be a positive number"));
        }
    }
    if lock.throttle_window.is_zero() {
        return Err(invalid("throttle_window must be non-zero"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
