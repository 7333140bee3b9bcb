// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `patchext`: the guest-side patch orchestration extension handler.
//!
//! Thin entry point. All real decision logic lives in [`lifecycle`] and
//! the `commands` modules; `main` only resolves paths, sets up logging, and
//! maps the result to a process exit code.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cli;
mod commands;
mod exit_error;
mod lifecycle;
mod logging;
mod spawn;
mod status_writer;

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use exit_error::{handler_failed, ExitError};
use pk_adapters::SystemdTimerService;
use pk_config::{load_handler_environment, ExtensionPaths};

const DEFAULT_HANDLER_ENVIRONMENT_FILE: &str = "HandlerEnvironment.json";
const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";

#[tokio::main]
async fn main() {
    let args = normalize_single_dash_flags(std::env::args().collect());
    let cli = cli::Cli::parse_from(args);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("patchext: {}", err.message);
            err.code
        }
    };
    std::process::exit(exit_code);
}

/// The host agent invokes this extension with single-dash flags
/// (`-install`, `-enable`, ...). `clap`'s subcommand parser expects a bare
/// positional name, so the leading dash is stripped before parsing, leaving
/// two-dash long options (`--handler-env`) and single-char short flags
/// (`-h`, `-V`) untouched.
fn normalize_single_dash_flags(args: Vec<String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            if arg.starts_with('-') && !arg.starts_with("--") && arg.len() > 2 {
                arg.trim_start_matches('-').to_string()
            } else {
                arg
            }
        })
        .collect()
}

async fn run(cli: cli::Cli) -> Result<(), ExitError> {
    let handler_env_path = cli
        .handler_env
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HANDLER_ENVIRONMENT_FILE));
    let paths = load_handler_environment(&handler_env_path).map_err(handler_failed)?;

    let verb = match cli.command {
        cli::Command::Install => "Install",
        cli::Command::Uninstall => "Uninstall",
        cli::Command::Enable => "Enable",
        cli::Command::Disable => "Disable",
        cli::Command::Update => "Update",
        cli::Command::Reset => "Reset",
    };
    let _log_guard = init_logging(&paths, verb);

    match cli.command {
        cli::Command::Install => commands::install::run(&paths),
        cli::Command::Uninstall => commands::uninstall::run(&paths),
        cli::Command::Reset => commands::reset::run(&paths),
        cli::Command::Enable => commands::enable::run(&paths).await,
        cli::Command::Disable => {
            let timer = SystemdTimerService::new(SYSTEMD_UNIT_DIR);
            commands::disable::run(&paths, &timer).await
        }
        cli::Command::Update => {
            let ext_root = paths
                .config_dir
                .parent()
                .map(std::path::Path::to_path_buf)
                .ok_or_else(|| handler_failed("config directory has no parent extension root"))?;
            commands::update::run(&ext_root)
        }
    }
}

fn init_logging(
    paths: &ExtensionPaths,
    verb: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let file_name = logging::log_file_name(Utc::now(), verb);
    logging::init(&paths.log_dir, &file_name).ok()
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
