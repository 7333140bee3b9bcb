// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable error taxonomy and process exit codes.
//!
//! `ErrorCode` is serialized into StatusFile error records and must stay
//! stable across refactors of the internal Rust error types used for
//! propagation (see `thiserror`-derived errors in each crate).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    DefaultError,
    OperationFailed,
    PackageManagerFailure,
    UaEsmRequired,
    TruncationApplied,
    ConfigInvalid,
    TelemetryNotSupported,
}

/// Process exit codes for the handler binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Okay = 0,
    OperationNotSupported = 3,
    HandlerFailed = 51,
    MissingDependency = 52,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
