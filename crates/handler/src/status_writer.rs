// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The handler's own narrow slice of status-file writing: the initial
//! `transitioning` placeholder (§4.1 step 2) and the `NoOperation` terminal
//! success status (§4.1 step 7). Everything richer — assessment and
//! installation substatuses, truncation — is composed by the core process
//! once it is running.

use std::path::Path;

use chrono::{DateTime, Utc};
use pk_core::Operation;
use pk_storage::{write_json_with_retry, RetryPolicy, StoreError};
use pk_wire::{FormattedMessage, Status, StatusFileEntry, SubstatusState, STATUS_NAME};

fn write_status(path: &Path, status: Status, now: DateTime<Utc>) -> Result<(), StoreError> {
    let entry = StatusFileEntry { version: 1.0, timestamp_utc: now, status };
    write_json_with_retry(path, &[entry], RetryPolicy::default())
}

/// Write the initial `transitioning` placeholder for sequence `N`, unless a
/// status file already exists for it.
pub fn write_initial_transitioning(
    path: &Path,
    operation: Operation,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    let status = Status {
        name: STATUS_NAME.to_string(),
        operation,
        status: SubstatusState::Transitioning,
        code: SubstatusState::Transitioning.code(),
        formatted_message: FormattedMessage::new("patch operation in progress"),
        substatus: vec![],
    };
    write_status(path, status, now)
}

/// Write a terminal success status for a `NoOperation` invocation.
pub fn write_no_operation_success(path: &Path, now: DateTime<Utc>) -> Result<(), StoreError> {
    let status = Status {
        name: STATUS_NAME.to_string(),
        operation: Operation::NoOperation,
        status: SubstatusState::Success,
        code: SubstatusState::Success.code(),
        formatted_message: FormattedMessage::new("no operation requested"),
        substatus: vec![],
    };
    write_status(path, status, now)
}

#[cfg(test)]
#[path = "status_writer_tests.rs"]
mod tests;
