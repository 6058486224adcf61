// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod acquire;
pub mod init;
pub mod reap;
pub mod release;
pub mod run;
pub mod status;

use std::process::ExitCode;
use std::time::Duration;

/// Exit code for "not admitted, retry later" (`EX_TEMPFAIL`)
pub const EXIT_RETRY_LATER: u8 = 75;

/// Exit code when gated work exceeds its timeout
pub const EXIT_WORK_TIMEOUT: u8 = 124;

pub fn retry_later() -> ExitCode {
    ExitCode::from(EXIT_RETRY_LATER)
}

/// Parse a human duration such as `30s` or `5m`
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| e.to_string())
}
