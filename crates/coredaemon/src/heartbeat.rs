// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic `CoreState.json` heartbeat refresh. Runs for the lifetime of
//! one operation; stopped by dropping its `JoinHandle` (via
//! `tokio::task::abort`) once the run completes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use pk_storage::{read_json_with_retry, write_json_with_retry, RetryPolicy};
use pk_wire::CoreState;
use tracing::{debug, warn};

/// Interval between heartbeat refreshes while a core run is in progress.
pub const INTERVAL: Duration = Duration::from_secs(15);

/// Refresh the heartbeat timestamp on the `CoreState.json` at `path` once.
/// A no-op (with a warning) if the file has gone missing or is unreadable;
/// heartbeat writes are best-effort and must never abort the run in
/// progress.
pub fn tick(path: &Path) {
    let mut state: CoreState = match read_json_with_retry(path, RetryPolicy::default()) {
        Ok(state) => state,
        Err(err) => {
            warn!(%err, "heartbeat: could not read CoreState.json, skipping this tick");
            return;
        }
    };
    state.heartbeat(Utc::now());
    if let Err(err) = write_json_with_retry(path, &state, RetryPolicy::default()) {
        warn!(%err, "heartbeat: could not persist CoreState.json");
        return;
    }
    debug!(path = %path.display(), "wrote heartbeat");
}

/// Spawn a background task that calls [`tick`] every [`INTERVAL`] until
/// aborted. The caller is responsible for calling `.abort()` on the
/// returned handle once the run completes.
pub fn spawn(path: PathBuf) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(INTERVAL).await;
            tick(&path);
        }
    })
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
