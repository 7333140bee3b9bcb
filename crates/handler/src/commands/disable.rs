// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `disable`: stop the auto-assessment timer and make a bounded best-effort
//! attempt to observe any in-flight core process finish before returning.

use std::path::Path;
use std::time::Duration;

use pk_adapters::AutoAssessmentService;
use pk_config::ExtensionPaths;
use pk_storage::{read_json_with_retry, RetryPolicy};
use pk_wire::CoreState;
use tokio::time::sleep;
use tracing::warn;

use crate::exit_error::{handler_failed, ExitError};

/// Upper bound on how long `disable` will wait for an in-flight core to
/// report `completed` before giving up and returning anyway.
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub async fn run(
    paths: &ExtensionPaths,
    auto_assessment: &dyn AutoAssessmentService,
) -> Result<(), ExitError> {
    auto_assessment.disable().await.map_err(handler_failed)?;

    let core_state_path = paths.config_dir.join("CoreState.json");
    wait_for_core_completion(&core_state_path, JOIN_TIMEOUT).await;
    Ok(())
}

async fn wait_for_core_completion(core_state_path: &Path, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let path = core_state_path.to_path_buf();
        let read = tokio::task::spawn_blocking(move || {
            read_json_with_retry::<CoreState>(&path, RetryPolicy::default())
        })
        .await;

        match read {
            Ok(Ok(state)) if state.completed => return,
            Ok(Ok(_)) => {}
            Ok(Err(_)) | Err(_) => return,
        }
        if tokio::time::Instant::now() >= deadline {
            warn!("disable: core did not report completion within the join timeout");
            return;
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
#[path = "disable_tests.rs"]
mod tests;
