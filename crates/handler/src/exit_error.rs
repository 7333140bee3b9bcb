// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Subcommands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use pk_core::ExitCode;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn from_exit_code(code: ExitCode, message: impl Into<String>) -> Self {
        Self::new(code.as_i32(), message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Maps any displayable error to a `HandlerFailed` exit, for call sites
/// with `.map_err(handler_failed)?` where the specific failure doesn't need
/// its own exit code.
pub fn handler_failed(err: impl std::fmt::Display) -> ExitError {
    ExitError::from_exit_code(ExitCode::HandlerFailed, err.to_string())
}
