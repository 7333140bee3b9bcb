// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uninstall`: best-effort cleanup of the directories `install` created.
//! A missing directory is not an error; anything else is.

use pk_config::ExtensionPaths;

use crate::exit_error::{handler_failed, ExitError};

pub fn run(paths: &ExtensionPaths) -> Result<(), ExitError> {
    for dir in [&paths.config_dir, &paths.status_dir, &paths.log_dir, &paths.events_dir] {
        match std::fs::remove_dir_all(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(handler_failed(e)),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "uninstall_tests.rs"]
mod tests;
