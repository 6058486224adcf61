// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution status as reported by the orchestration engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of the execution that owns a holder slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
    /// Not found, not yet visible, or unrecognized
    Unknown,
}

impl ExecutionStatus {
    /// Whether the execution has finished and can no longer release its own slot
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded
                | ExecutionStatus::Failed
                | ExecutionStatus::TimedOut
                | ExecutionStatus::Aborted
        )
    }

    /// Parse a status word, mapping anything unrecognized to `Unknown`
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(ExecutionStatus::Unknown)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::TimedOut => "TIMED_OUT",
            ExecutionStatus::Aborted => "ABORTED",
            ExecutionStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Unrecognized status word
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized execution status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for ExecutionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "RUNNING" | "PENDING_REDRIVE" => Ok(ExecutionStatus::Running),
            "SUCCEEDED" | "SUCCESS" => Ok(ExecutionStatus::Succeeded),
            "FAILED" => Ok(ExecutionStatus::Failed),
            "TIMED_OUT" | "TIMEDOUT" => Ok(ExecutionStatus::TimedOut),
            "ABORTED" => Ok(ExecutionStatus::Aborted),
            "UNKNOWN" | "NOT_FOUND" => Ok(ExecutionStatus::Unknown),
            _ => Err(ParseStatusError(s.trim().to_string())),
        }
    }
}
