// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reset`: drop every persisted state file (ExtState, CoreState, status
//! documents) and re-create the directory layout from scratch, as if
//! `install` had just run on a machine with no prior history.

use pk_config::ExtensionPaths;

use crate::exit_error::{handler_failed, ExitError};

const EXT_STATE_FILE: &str = "ExtState.json";
const CORE_STATE_FILE: &str = "CoreState.json";

pub fn run(paths: &ExtensionPaths) -> Result<(), ExitError> {
    remove_file_if_present(&paths.config_dir.join(EXT_STATE_FILE))?;
    remove_file_if_present(&paths.config_dir.join(CORE_STATE_FILE))?;
    clear_dir(&paths.status_dir)?;

    for dir in [&paths.config_dir, &paths.status_dir, &paths.log_dir, &paths.events_dir] {
        std::fs::create_dir_all(dir).map_err(handler_failed)?;
    }
    Ok(())
}

fn remove_file_if_present(path: &std::path::Path) -> Result<(), ExitError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(handler_failed(e)),
    }
}

fn clear_dir(dir: &std::path::Path) -> Result<(), ExitError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(handler_failed(e)),
    }
}

#[cfg(test)]
#[path = "reset_tests.rs"]
mod tests;
