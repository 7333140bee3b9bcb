// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SUSE family adapter, driving `zypper`.
//!
//! Recognized zypper exit codes: 103 (package manager itself was updated,
//! rerun), 102 (reboot required), 7 (locked, retryable), 6 (no repos
//! defined, needs a refresh), 8 (file conflict, retry with `--replacefiles`).

use async_trait::async_trait;
use pk_core::EnvVarGuard;

use crate::package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};
use crate::process_runner::run_capture;

const ZYPP_LOCK_TIMEOUT_ENV: &str = "ZYPP_LOCK_TIMEOUT";
const ZYPP_LOCK_TIMEOUT_SECONDS: &str = "5";

const EXIT_MANAGER_UPDATED: i32 = 103;
const EXIT_REBOOT_REQUIRED: i32 = 102;
const EXIT_LOCKED: i32 = 7;
const EXIT_NO_REPOS: i32 = 6;
const EXIT_FILE_CONFLICT: i32 = 8;

/// Maps a `zypper install` exit code to its install outcome, in isolation
/// from spawning a real `zypper` process.
fn classify_install_exit(status_code: Option<i32>) -> (InstallOutcome, RepeatRequired) {
    match status_code {
        Some(0) => (InstallOutcome::Installed, RepeatRequired(false)),
        Some(code) if code == EXIT_MANAGER_UPDATED => (InstallOutcome::Pending, RepeatRequired(true)),
        Some(code) if code == EXIT_REBOOT_REQUIRED => (InstallOutcome::Installed, RepeatRequired(false)),
        Some(code) if code == EXIT_LOCKED => (InstallOutcome::Pending, RepeatRequired(false)),
        Some(code) if code == EXIT_FILE_CONFLICT => (InstallOutcome::Failed, RepeatRequired(false)),
        _ => (InstallOutcome::Failed, RepeatRequired(false)),
    }
}

pub struct ZypperPackageManager;

impl ZypperPackageManager {
    pub fn new() -> Self {
        Self
    }

    fn parse_list_updates_line(line: &str) -> Option<NamedVersion> {
        // `v | repository | name | version | arch` pipe-table rows from
        // `zypper -x` output stripped to plain columns.
        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() < 4 {
            return None;
        }
        Some(NamedVersion::new(fields[2], fields[3]))
    }
}

impl Default for ZypperPackageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageManager for ZypperPackageManager {
    fn family(&self) -> PackageManagerFamily {
        PackageManagerFamily::Zypper
    }

    async fn refresh_repository(&self) -> Result<(), PackageManagerError> {
        let _guard = EnvVarGuard::set(ZYPP_LOCK_TIMEOUT_ENV, ZYPP_LOCK_TIMEOUT_SECONDS);
        let output = run_capture("zypper", &["--non-interactive", "refresh"]).await?;
        match output.status_code {
            Some(0) => Ok(()),
            Some(code) if code == EXIT_NO_REPOS => Err(PackageManagerError::RefreshFailed(output.combined())),
            _ => Err(PackageManagerError::RefreshFailed(output.combined())),
        }
    }

    async fn get_all_updates(&self, _cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let _guard = EnvVarGuard::set(ZYPP_LOCK_TIMEOUT_ENV, ZYPP_LOCK_TIMEOUT_SECONDS);
        let output = run_capture("zypper", &["--non-interactive", "list-updates"]).await?;
        Ok(output.stdout.lines().filter_map(Self::parse_list_updates_line).collect())
    }

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let _guard = EnvVarGuard::set(ZYPP_LOCK_TIMEOUT_ENV, ZYPP_LOCK_TIMEOUT_SECONDS);
        let output =
            run_capture("zypper", &["--non-interactive", "list-patches", "--category", "security"]).await?;
        Ok(output.stdout.lines().filter_map(Self::parse_list_updates_line).collect())
    }

    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let all = self.get_all_updates(false).await?;
        let security = self.get_security_updates().await?;
        Ok(all.into_iter().filter(|nv| !security.contains(nv)).collect())
    }

    async fn get_all_available_versions(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let output = run_capture("zypper", &["--non-interactive", "info", name]).await?;
        Ok(output
            .stdout
            .lines()
            .filter_map(|line| line.strip_prefix("Version").map(|rest| rest.trim_start_matches([':', ' ']).to_string()))
            .collect())
    }

    async fn is_package_version_installed(
        &self,
        name: &str,
        version: &str,
    ) -> Result<bool, PackageManagerError> {
        let output = run_capture("rpm", &["-q", "--qf=%{VERSION}-%{RELEASE}", name]).await?;
        Ok(output.status_code == Some(0) && output.stdout.trim() == version)
    }

    async fn get_dependents(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let output = run_capture("zypper", &["--non-interactive", "what-provides", name]).await?;
        Ok(output.stdout.lines().map(|line| line.trim().to_string()).filter(|l| !l.is_empty()).collect())
    }

    async fn install_update_and_dependencies(
        &self,
        names: &[NamedVersion],
        simulate: bool,
    ) -> Result<(InstallOutcome, RepeatRequired), PackageManagerError> {
        if names.is_empty() {
            return Ok((InstallOutcome::Excluded, RepeatRequired(false)));
        }
        let _guard = EnvVarGuard::set(ZYPP_LOCK_TIMEOUT_ENV, ZYPP_LOCK_TIMEOUT_SECONDS);
        let mut args = vec!["--non-interactive", "install"];
        if simulate {
            args.push("--dry-run");
        }
        let package_args: Vec<String> = names.iter().map(|nv| format!("{}={}", nv.name, nv.version)).collect();
        args.extend(package_args.iter().map(String::as_str));

        let output = run_capture("zypper", &args).await?;
        Ok(classify_install_exit(output.status_code))
    }

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError> {
        let output = run_capture("systemctl", &["is-enabled", "zypper-refresh.timer"]).await?;
        Ok(match output.stdout.trim() {
            "enabled" => AutoOsPatchState::Enabled,
            "disabled" => AutoOsPatchState::Disabled,
            _ => AutoOsPatchState::Unknown,
        })
    }

    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError> {
        let _ = run_capture("systemctl", &["disable", "--now", "zypper-refresh.timer"]).await?;
        Ok(())
    }

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError> {
        let output = run_capture("zypper", &["needs-rebooting"]).await?;
        Ok(output.status_code == Some(EXIT_REBOOT_REQUIRED) || output.status_code == Some(102))
    }
}

#[cfg(test)]
#[path = "zypper_tests.rs"]
mod tests;
