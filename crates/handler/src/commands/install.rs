// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `install`: one-time setup. Creates the directories the host agent
//! declared in `HandlerEnvironment.json`, if they don't already exist.

use pk_config::ExtensionPaths;

use crate::exit_error::{handler_failed, ExitError};

pub fn run(paths: &ExtensionPaths) -> Result<(), ExitError> {
    for dir in [&paths.config_dir, &paths.status_dir, &paths.log_dir, &paths.events_dir] {
        std::fs::create_dir_all(dir).map_err(handler_failed)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
