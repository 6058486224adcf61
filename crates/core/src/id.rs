// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for holders and executions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the orchestration execution that owns a holder slot.
///
/// This is what the reaper hands to the orchestration engine's status query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub String);

impl ExecutionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a single admitted occupant of a slot.
///
/// Stable across retries of the same logical attempt and distinct across
/// attempts. Two acquires with the same id count once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(pub String);

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Holder identity for an execution that takes at most one slot
    pub fn for_execution(execution: &ExecutionId) -> Self {
        Self(execution.0.clone())
    }

    /// Holder identity for one attempt of an execution
    pub fn for_attempt(execution: &ExecutionId, attempt: &str) -> Self {
        Self(format!("{}#{}", execution.0, attempt))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
