// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached-spawn helper for the core process. The handler must return
//! quickly; the core keeps running after the handler exits, so it is
//! spawned with stdio detached from the handler's own pipes.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn core binary at {path}: {source}")]
    Spawn { path: String, #[source] source: std::io::Error },
}

/// Spawn `core_binary` detached from the handler's own stdio, passing
/// `handler_env` as its working directory so it can discover
/// `HandlerEnvironment.json` the same way the handler did, and
/// `settings_path` as its sole positional argument. Returns the spawned
/// process id without waiting on it.
pub fn spawn_core_detached(
    core_binary: &Path,
    handler_env: &Path,
    settings_path: &Path,
) -> Result<u32, SpawnError> {
    let child = std::process::Command::new(core_binary)
        .arg(settings_path)
        .current_dir(handler_env)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| SpawnError::Spawn { path: core_binary.display().to_string(), source })?;

    Ok(child.id())
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
