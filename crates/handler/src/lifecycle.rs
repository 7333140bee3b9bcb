// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The handler's `enable` algorithm: reconcile with any previously running
//! operation of the same extension sequence, then spawn the core or settle
//! a terminal no-op/unsupported outcome.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use pk_config::RuntimeSettings;
use pk_core::Operation;
use pk_wire::{CoreState, ExtState};

/// Default wait for a re-enable of the same in-flight sequence, before
/// giving up and exiting successfully without spawning.
pub const DEFAULT_WAIT_MINUTES: i64 = 30;
/// Default heartbeat staleness threshold before a prior run is reaped as
/// dead.
pub const DEFAULT_HEARTBEAT_STALENESS_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableDecision {
    /// Spawn a core process for this sequence.
    SpawnCore,
    /// A live prior run of the same sequence is still in flight; the
    /// handler should wait (bounded by `DEFAULT_WAIT_MINUTES`) rather than
    /// spawn a duplicate core.
    WaitForPriorRun,
    /// `NoOperation`: no core is ever spawned; write a terminal success
    /// status and return.
    NoOperationTerminalSuccess,
    /// Unrecognized operation in the settings document.
    UnsupportedOperation,
}

/// Classify this invocation per SPEC_FULL §4.1 step 4: re-enable of the
/// identical sequence with a live prior run waits; anything else (new
/// sequence, or prior run completed/stale) spawns fresh.
pub fn classify_enable(
    settings: &RuntimeSettings,
    sequence_number: u64,
    ext_state: Option<&ExtState>,
    core_state: Option<&CoreState>,
    now: DateTime<Utc>,
) -> EnableDecision {
    if settings.operation == Operation::NoOperation {
        return EnableDecision::NoOperationTerminalSuccess;
    }
    if !settings.operation.spawns_core() {
        return EnableDecision::UnsupportedOperation;
    }

    let is_reenable_of_same_sequence =
        ext_state.map(|s| s.extension_sequence.number == sequence_number).unwrap_or(false);

    if is_reenable_of_same_sequence {
        if let Some(core_state) = core_state {
            let staleness = ChronoDuration::minutes(DEFAULT_HEARTBEAT_STALENESS_MINUTES);
            if !core_state.completed && !core_state.is_stale(now, staleness) {
                return EnableDecision::WaitForPriorRun;
            }
        }
    }

    EnableDecision::SpawnCore
}

/// Build the ExtState persisted once a decision to spawn (or wait) has been
/// made: `{N, nowUTC + W, op}`.
pub fn next_ext_state(sequence_number: u64, operation: Operation, now: DateTime<Utc>) -> ExtState {
    let achieve_enable_by = now + ChronoDuration::minutes(DEFAULT_WAIT_MINUTES);
    ExtState::new(sequence_number, achieve_enable_by, operation)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
