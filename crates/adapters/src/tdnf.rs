// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Azure Linux / Mariner family adapter, driving `tdnf`. Command surface and
//! output shape mirror `yum`; `tdnf` is the DNF-compatible reimplementation
//! used on Mariner/Azure Linux images.

use async_trait::async_trait;

use crate::package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};
use crate::process_runner::run_capture;

pub struct TdnfPackageManager;

impl TdnfPackageManager {
    pub fn new() -> Self {
        Self
    }

    fn parse_check_update_line(line: &str) -> Option<NamedVersion> {
        let mut parts = line.split_whitespace();
        let name_arch = parts.next()?;
        let version = parts.next()?.to_string();
        let name = name_arch.rsplit_once('.').map(|(n, _)| n).unwrap_or(name_arch);
        Some(NamedVersion::new(name, version))
    }
}

impl Default for TdnfPackageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageManager for TdnfPackageManager {
    fn family(&self) -> PackageManagerFamily {
        PackageManagerFamily::Tdnf
    }

    async fn refresh_repository(&self) -> Result<(), PackageManagerError> {
        let output = run_capture("tdnf", &["makecache"]).await?;
        match output.status_code {
            Some(0) => Ok(()),
            _ => Err(PackageManagerError::RefreshFailed(output.combined())),
        }
    }

    async fn get_all_updates(&self, _cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("tdnf", &["check-update"]).await?;
        if !matches!(output.status_code, Some(0) | Some(100)) {
            return Err(PackageManagerError::QueryFailed(output.combined()));
        }
        Ok(output.stdout.lines().filter_map(Self::parse_check_update_line).collect())
    }

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("tdnf", &["check-update", "--security"]).await?;
        if !matches!(output.status_code, Some(0) | Some(100)) {
            return Ok(Vec::new());
        }
        Ok(output.stdout.lines().filter_map(Self::parse_check_update_line).collect())
    }

    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let all = self.get_all_updates(false).await?;
        let security = self.get_security_updates().await?;
        Ok(all.into_iter().filter(|nv| !security.contains(nv)).collect())
    }

    async fn get_all_available_versions(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let output = run_capture("tdnf", &["list", name, "--showduplicates"]).await?;
        Ok(output
            .stdout
            .lines()
            .filter_map(Self::parse_check_update_line)
            .map(|nv| nv.version)
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
        let output = run_capture("tdnf", &["repoquery", "--whatrequires", name]).await?;
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
        let mut args = vec!["install", "-y"];
        if simulate {
            args.push("--assumeno");
        }
        let package_args: Vec<String> = names.iter().map(|nv| format!("{}-{}", nv.name, nv.version)).collect();
        args.extend(package_args.iter().map(String::as_str));

        let output = run_capture("tdnf", &args).await?;
        let outcome = match output.status_code {
            Some(0) => InstallOutcome::Installed,
            _ if output.combined().to_lowercase().contains("nothing to do") => InstallOutcome::Installed,
            _ => InstallOutcome::Failed,
        };
        Ok((outcome, RepeatRequired(false)))
    }

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError> {
        let output = run_capture("systemctl", &["is-enabled", "tdnf-automatic.timer"]).await?;
        Ok(match output.stdout.trim() {
            "enabled" => AutoOsPatchState::Enabled,
            "disabled" => AutoOsPatchState::Disabled,
            _ => AutoOsPatchState::Unknown,
        })
    }

    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError> {
        let _ = run_capture("systemctl", &["disable", "--now", "tdnf-automatic.timer"]).await?;
        Ok(())
    }

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError> {
        Ok(std::path::Path::new("/var/run/reboot-required").exists())
    }
}

#[cfg(test)]
#[path = "tdnf_tests.rs"]
mod tests;
