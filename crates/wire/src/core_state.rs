// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `CoreState.json` — the core process's own liveness record. Written with
//! a fresh heartbeat every few seconds while running; `completed` flips to
//! `true` exactly once, on exit.

use chrono::{DateTime, Utc};
use pk_core::Operation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreState {
    pub number: u64,
    pub action: Operation,
    pub completed: bool,
    #[serde(rename = "lastHeartbeat")]
    pub last_heartbeat: DateTime<Utc>,
    #[serde(rename = "processIds")]
    pub process_ids: Vec<u32>,
}

impl CoreState {
    pub fn started(number: u64, action: Operation, now: DateTime<Utc>, pid: u32) -> Self {
        Self { number, action, completed: false, last_heartbeat: now, process_ids: vec![pid] }
    }

    /// Refresh the heartbeat timestamp in place; does not touch `completed`.
    pub fn heartbeat(&mut self, now: DateTime<Utc>) {
        self.last_heartbeat = now;
    }

    /// Mark the run finished. `completed` only ever transitions `false ->
    /// true`; calling this again is a no-op, never reverting to `false`.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Heartbeat is stale once `now - last_heartbeat` exceeds `staleness`.
    pub fn is_stale(&self, now: DateTime<Utc>, staleness: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_heartbeat) > staleness
    }
}

#[cfg(test)]
#[path = "core_state_tests.rs"]
mod tests;
