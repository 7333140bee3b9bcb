// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface for `patchext`. Matches the host agent's extension
//! handler calling convention: single-dash long flags, one subcommand per
//! extension lifecycle verb.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "patchext",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Guest-side patch orchestration extension handler"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root directory containing `HandlerEnvironment.json`. Defaults to the
    /// extension's own installation directory (current working directory)
    /// when unset.
    #[arg(long, global = true)]
    pub handler_env: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// One-time setup: create config/status/log directories.
    #[command(name = "install")]
    Install,
    /// Reverse of `install`: best-effort cleanup of extension state.
    #[command(name = "uninstall")]
    Uninstall,
    /// Reconcile with any prior run and spawn the core process if needed.
    #[command(name = "enable")]
    Enable,
    /// Stop the auto-assessment timer and bound-wait for any in-flight core.
    #[command(name = "disable")]
    Disable,
    /// Carry state forward from the immediately preceding extension version.
    #[command(name = "update")]
    Update,
    /// Drop all persisted extension state and re-initialize from scratch.
    #[command(name = "reset")]
    Reset,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
