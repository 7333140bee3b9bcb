// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helper for invoking real package-manager CLI binaries. Every
//! family adapter shells out through here rather than through a hand-rolled
//! shell parser.

use tokio::process::Command;

use crate::package_manager::PackageManagerError;

pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Run `binary` with `args`, capturing stdout/stderr. Never invokes a shell;
/// arguments are passed directly to `exec`.
pub async fn run_capture(binary: &'static str, args: &[&str]) -> Result<CommandOutput, PackageManagerError> {
    let output = Command::new(binary)
        .args(args)
        .output()
        .await
        .map_err(|source| PackageManagerError::Spawn { binary, source })?;

    Ok(CommandOutput {
        status_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
#[path = "process_runner_tests.rs"]
mod tests;
