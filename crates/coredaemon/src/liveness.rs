// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance detection. Unlike the teacher daemon's `flock`-based
//! lock file (`daemon::lifecycle::startup`'s `try_lock_exclusive`), the core
//! process treats `CoreState.json`'s own heartbeat and recorded process ids
//! as the liveness record, matching §5/§9's handler-observes-the-same-state
//! design: the handler already reaps a stale prior run this way, so the
//! core checking itself in before starting uses the identical rule rather
//! than a second, inconsistent mechanism.

use chrono::{DateTime, Duration, Utc};
use pk_wire::CoreState;

/// Default heartbeat-staleness threshold, mirroring the handler's own
/// `DEFAULT_HEARTBEAT_STALENESS_MINUTES`.
pub const DEFAULT_STALENESS_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorInstance {
    /// No recorded prior run for this sequence, or it already completed.
    None,
    /// A prior run's heartbeat is fresh and at least one of its recorded
    /// process ids is still alive.
    Alive,
    /// A prior run exists but is either stale or none of its recorded
    /// process ids are alive; safe to proceed.
    Dead,
}

/// This extension only targets Linux guests, so a `/proc/<pid>` existence
/// check is authoritative without an extra `libc`/`nix` dependency.
fn pid_is_alive(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

/// Classify `core_state` (the prior run's persisted record, if any) against
/// `now` and `staleness`.
pub fn classify(core_state: Option<&CoreState>, now: DateTime<Utc>, staleness: Duration) -> PriorInstance {
    let Some(state) = core_state else { return PriorInstance::None };
    if state.completed {
        return PriorInstance::None;
    }
    if state.is_stale(now, staleness) {
        return PriorInstance::Dead;
    }
    if state.process_ids.iter().any(|pid| pid_is_alive(*pid)) {
        PriorInstance::Alive
    } else {
        PriorInstance::Dead
    }
}

#[cfg(test)]
#[path = "liveness_tests.rs"]
mod tests;
