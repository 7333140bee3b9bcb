// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `enable`: the handler's hard part. See [`crate::lifecycle`] for the
//! decision logic this wires together.

use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use pk_config::{discover_sequence_number, load_settings, settings_path, ExtensionPaths};
use pk_core::ExitCode;
use pk_storage::{read_json_with_retry, write_json_with_retry, RetryPolicy};
use pk_wire::{CoreState, ExtState};
use tracing::warn;

use crate::exit_error::{handler_failed, ExitError};
use crate::lifecycle::{
    classify_enable, next_ext_state, EnableDecision, DEFAULT_HEARTBEAT_STALENESS_MINUTES,
    DEFAULT_WAIT_MINUTES,
};
use crate::spawn::spawn_core_detached;
use crate::status_writer::{write_initial_transitioning, write_no_operation_success};

const EXT_STATE_FILE: &str = "ExtState.json";
const CORE_STATE_FILE: &str = "CoreState.json";

/// Sibling binary name of the core process, resolved next to the handler's
/// own executable.
const CORE_BINARY_NAME: &str = "patchextd";

/// Interval between `CoreState.json` re-reads while waiting out a prior
/// in-flight run of the same sequence.
const WAIT_POLL_INTERVAL: StdDuration = StdDuration::from_secs(2);

pub async fn run(paths: &ExtensionPaths) -> Result<(), ExitError> {
    let now = Utc::now();

    let sequence_number = discover_sequence_number(&paths.config_dir).map_err(handler_failed)?;
    let status_path = paths.status_dir.join(format!("{sequence_number}.status"));
    let settings = load_settings(&paths.config_dir, sequence_number).map_err(handler_failed)?;

    write_initial_transitioning(&status_path, settings.operation, now).map_err(handler_failed)?;

    let ext_state_path = paths.config_dir.join(EXT_STATE_FILE);
    let core_state_path = paths.config_dir.join(CORE_STATE_FILE);
    let ext_state = read_optional::<ExtState>(&ext_state_path)?;
    let core_state = read_optional::<CoreState>(&core_state_path)?;

    let decision =
        classify_enable(&settings, sequence_number, ext_state.as_ref(), core_state.as_ref(), now);

    match decision {
        EnableDecision::WaitForPriorRun => {
            let prior_run_is_over = wait_for_prior_run(
                &core_state_path,
                StdDuration::from_secs(60 * DEFAULT_WAIT_MINUTES as u64),
                ChronoDuration::minutes(DEFAULT_HEARTBEAT_STALENESS_MINUTES),
                WAIT_POLL_INTERVAL,
            )
            .await;

            if prior_run_is_over {
                spawn_core(paths, sequence_number, settings.operation, &ext_state_path)
            } else {
                Ok(())
            }
        }
        EnableDecision::NoOperationTerminalSuccess => {
            write_no_operation_success(&status_path, now).map_err(handler_failed)
        }
        EnableDecision::UnsupportedOperation => {
            Err(ExitError::from_exit_code(ExitCode::OperationNotSupported, "unrecognized operation"))
        }
        EnableDecision::SpawnCore => {
            spawn_core(paths, sequence_number, settings.operation, &ext_state_path)
        }
    }
}

/// Persist a fresh ExtState and spawn the core as a detached process.
/// Shared by the immediate-spawn decision and by the wait loop once a prior
/// run is found to have finished or gone stale.
fn spawn_core(
    paths: &ExtensionPaths,
    sequence_number: u64,
    operation: pk_core::Operation,
    ext_state_path: &Path,
) -> Result<(), ExitError> {
    let fresh_ext_state = next_ext_state(sequence_number, operation, Utc::now());
    write_json_with_retry(ext_state_path, &fresh_ext_state, RetryPolicy::default()).map_err(handler_failed)?;

    let handler_env =
        paths.config_dir.parent().map(Path::to_path_buf).unwrap_or_else(|| paths.config_dir.clone());
    let core_binary = core_binary_path()?;
    let settings_file = settings_path(&paths.config_dir, sequence_number);
    spawn_core_detached(&core_binary, &handler_env, &settings_file).map_err(handler_failed)?;
    Ok(())
}

/// Poll `core_state_path` until it reports `completed`, its heartbeat goes
/// stale (per `staleness`), or `total_wait` elapses, whichever comes
/// first. Returns `true` once the prior run should be treated as over
/// (completed, stale, or its state file is gone/unreadable) so the caller
/// should spawn a fresh core; `false` if the wait timed out with the prior
/// run still live, in which case `enable` must exit successfully without
/// spawning a duplicate.
async fn wait_for_prior_run(
    core_state_path: &Path,
    total_wait: StdDuration,
    staleness: ChronoDuration,
    poll_interval: StdDuration,
) -> bool {
    let deadline = tokio::time::Instant::now() + total_wait;

    loop {
        let now: DateTime<Utc> = Utc::now();
        match read_optional::<CoreState>(core_state_path) {
            Ok(Some(state)) if state.completed || state.is_stale(now, staleness) => return true,
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return true,
        }

        if tokio::time::Instant::now() >= deadline {
            warn!("enable: prior run of this sequence is still live after the wait timeout; exiting without spawning");
            return false;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

fn read_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ExitError> {
    if !path.exists() {
        return Ok(None);
    }
    read_json_with_retry(path, RetryPolicy::default()).map(Some).map_err(handler_failed)
}

fn core_binary_path() -> Result<PathBuf, ExitError> {
    let handler_exe = std::env::current_exe().map_err(handler_failed)?;
    let dir = handler_exe.parent().ok_or_else(|| handler_failed("handler executable has no parent directory"))?;
    Ok(dir.join(CORE_BINARY_NAME))
}

#[cfg(test)]
#[path = "enable_tests.rs"]
mod tests;
