// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error carries what went wrong, why it might have happened and how to
//! fix it.

use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Error for a lock name the store does not have.
    pub fn lock_not_found(lock: &str) -> Self {
        CliError::new(format!("Lock '{}' not found", lock))
            .with_context("Locks are created once, before any caller acquires them")
            .with_context("A lock created with a TTL disappears once it expires")
            .with_suggestion("Create locks listed in sluice.toml: sluice init")
            .with_suggestion(format!(
                "Create it directly: sluice init --lock {} --limit <N>",
                lock
            ))
    }

    /// Error for a store that could not be reached.
    pub fn store_unavailable(store: &str, cause: &str) -> Self {
        CliError::new(format!("Lock store at '{}' is unavailable", store))
            .with_context(cause.to_string())
            .with_context("Whether the last acquire took a slot is unknown")
            .with_suggestion("Retry the same command; acquire with the same holder is safe")
    }

    /// Error for an explicitly named config file that is missing.
    pub fn config_missing(path: &str) -> Self {
        CliError::new(format!("Config file '{}' not found", path))
            .with_suggestion("Pass an existing file with --config")
            .with_suggestion("Or point at a store directly with --store <DIR>")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}
