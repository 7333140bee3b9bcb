// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `patchextd`: the guest-side patch orchestration core process.
//!
//! Spawned detached by the handler's `enable` command with the sequenced
//! settings-document path as its sole positional argument and the
//! extension's own installation directory as its working directory. Thin
//! entry point; all decision logic lives in [`run`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod configure_patching;
mod distro;
mod error;
mod family;
mod heartbeat;
mod liveness;
mod logging;
mod run;
mod status_compose;

use std::path::PathBuf;

use chrono::Utc;

#[tokio::main]
async fn main() {
    let settings_path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("patchextd: missing required settings-document argument");
            std::process::exit(1);
        }
    };
    let handler_env = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // The log directory isn't known until HandlerEnvironment.json is
    // loaded inside `run::run`, so the run logs to stderr only until then;
    // `run::run` re-initializes logging once paths are resolved. For
    // simplicity the daemon keeps one logging pipeline rooted at the
    // working directory's `log/` folder, matching the handler's own
    // layout.
    let log_dir = handler_env.join("log");
    let file_name = logging::log_file_name(Utc::now(), "CoreMain");
    let _log_guard = logging::init(&log_dir, &file_name).ok();

    match run::run(&settings_path, &handler_env).await {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("patchextd: {err}");
            tracing::error!(%err, "core run failed");
            std::process::exit(51);
        }
    }
}
