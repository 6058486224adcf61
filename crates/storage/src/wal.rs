// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of lock store mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sluice_core::{Holder, HolderId, LockConfig, LockRecord};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt entry at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

/// A persisted mutation of the lock table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreOp {
    LockCreate {
        config: LockConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires_at: Option<DateTime<Utc>>,
    },
    HolderAcquire {
        lock: String,
        holder: Holder,
    },
    HolderRelease {
        lock: String,
        holder_id: HolderId,
    },
    LockPurge {
        lock: String,
    },
    /// Full record written by compaction
    LockSnapshot {
        record: LockRecord,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct WalEntry {
    seq: u64,
    op: StoreOp,
}

/// Append-only log; one JSON entry per line, synced after every append
pub struct Wal {
    path: PathBuf,
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create a WAL, returning it with every operation it holds
    ///
    /// A torn final entry is dropped from the file so later appends start on a
    /// clean line.
    pub fn open(path: &Path) -> Result<(Self, Vec<StoreOp>), WalError> {
        let (ops, torn) = Self::read(path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        let mut wal = Self {
            path: path.to_path_buf(),
            file,
            sequence: ops.len() as u64,
        };
        if torn {
            wal.rewrite(&ops)?;
        }
        Ok((wal, ops))
    }

    /// Append an operation to the log
    pub fn append(&mut self, op: &StoreOp) -> Result<u64, WalError> {
        self.sequence += 1;
        let entry = WalEntry {
            seq: self.sequence,
            op: op.clone(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        Ok(self.sequence)
    }

    /// Number of entries in the log
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replace the log with the given operations.
    ///
    /// Writes a sibling temp file and renames it over the log, so a crash
    /// leaves either the old or the new log in place.
    pub fn rewrite(&mut self, ops: &[StoreOp]) -> Result<(), WalError> {
        let tmp_path = self.path.with_extension("wal.tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            for (i, op) in ops.iter().enumerate() {
                let entry = WalEntry {
                    seq: i as u64 + 1,
                    op: op.clone(),
                };
                writeln!(tmp, "{}", serde_json::to_string(&entry)?)?;
            }
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        self.file = OpenOptions::new().append(true).open(&self.path)?;
        self.sequence = ops.len() as u64;
        Ok(())
    }

    /// Replay all operations from the log.
    ///
    /// An unparseable final line is a torn write from a crash and is skipped;
    /// an unparseable line anywhere else is corruption.
    pub fn replay(path: &Path) -> Result<Vec<StoreOp>, WalError> {
        Self::read(path).map(|(ops, _)| ops)
    }

    fn read(path: &Path) -> Result<(Vec<StoreOp>, bool), WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), false)),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<String> = BufReader::new(file).lines().collect::<Result<_, _>>()?;
        let last = lines.len();
        let mut ops = Vec::with_capacity(last);
        let mut torn = false;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(line) {
                Ok(entry) => ops.push(entry.op),
                Err(e) if i + 1 == last => {
                    tracing::warn!(line = i + 1, error = %e, "skipping torn WAL entry");
                    torn = true;
                }
                Err(e) => {
                    return Err(WalError::Corrupt {
                        line: i + 1,
                        reason: e.to_string(),
                    })
                }
            }
        }

        Ok((ops, torn))
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
