// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debian/Ubuntu family adapter, driving `apt-get`/`apt-cache`/`dpkg-query`.

use async_trait::async_trait;

use crate::package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};
use crate::process_runner::run_capture;

const AUTO_UPGRADES_FILE: &str = "/etc/apt/apt.conf.d/20auto-upgrades";
const REBOOT_REQUIRED_FILE: &str = "/var/run/reboot-required";

pub struct AptPackageManager;

impl AptPackageManager {
    pub fn new() -> Self {
        Self
    }

    /// Parses one line of `apt list --upgradable` output, e.g.
    /// `bash/jammy-security 5.1-6ubuntu1.1 amd64 [upgradable from: 5.1-6ubuntu1]`.
    fn parse_upgradable_line(line: &str) -> Option<(NamedVersion, bool)> {
        let mut parts = line.split_whitespace();
        let name_suite = parts.next()?;
        let version = parts.next()?.to_string();
        let (name, suite) = name_suite.split_once('/')?;
        let is_security = suite.contains("security");
        Some((NamedVersion::new(name, version), is_security))
    }
}

impl Default for AptPackageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageManager for AptPackageManager {
    fn family(&self) -> PackageManagerFamily {
        PackageManagerFamily::Apt
    }

    async fn refresh_repository(&self) -> Result<(), PackageManagerError> {
        let output = run_capture("apt-get", &["update"]).await?;
        match output.status_code {
            Some(0) => Ok(()),
            _ => Err(PackageManagerError::RefreshFailed(output.combined())),
        }
    }

    async fn get_all_updates(&self, _cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("apt", &["list", "--upgradable"]).await?;
        Ok(output
            .stdout
            .lines()
            .filter_map(Self::parse_upgradable_line)
            .map(|(nv, _)| nv)
            .collect())
    }

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("apt", &["list", "--upgradable"]).await?;
        Ok(output
            .stdout
            .lines()
            .filter_map(Self::parse_upgradable_line)
            .filter(|(_, is_security)| *is_security)
            .map(|(nv, _)| nv)
            .collect())
    }

    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("apt", &["list", "--upgradable"]).await?;
        Ok(output
            .stdout
            .lines()
            .filter_map(Self::parse_upgradable_line)
            .filter(|(_, is_security)| !*is_security)
            .map(|(nv, _)| nv)
            .collect())
    }

    async fn get_all_available_versions(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let output = run_capture("apt-cache", &["madison", name]).await?;
        Ok(output
            .stdout
            .lines()
            .filter_map(|line| line.split('|').nth(1).map(|v| v.trim().to_string()))
            .collect())
    }

    async fn is_package_version_installed(
        &self,
        name: &str,
        version: &str,
    ) -> Result<bool, PackageManagerError> {
        let output = run_capture("dpkg-query", &["-W", "-f=${Version}", name]).await?;
        Ok(output.status_code == Some(0) && output.stdout.trim() == version)
    }

    async fn get_dependents(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let output = run_capture("apt-cache", &["rdepends", name]).await?;
        Ok(output
            .stdout
            .lines()
            .skip(2)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
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
            args.push("-s");
        }
        let package_args: Vec<String> = names.iter().map(|nv| format!("{}={}", nv.name, nv.version)).collect();
        let package_refs: Vec<&str> = package_args.iter().map(String::as_str).collect();
        args.extend(package_refs);

        let output = run_capture("apt-get", &args).await?;
        let combined = output.combined();

        if combined.contains("dpkg was interrupted") {
            return Err(PackageManagerError::NotHealthy {
                family: "apt",
                detail: "dpkg was interrupted; manual recovery required".to_string(),
            });
        }

        let outcome = match output.status_code {
            Some(0) => InstallOutcome::Installed,
            _ if combined.to_lowercase().contains("nothing to do") => InstallOutcome::Installed,
            _ => InstallOutcome::Failed,
        };
        Ok((outcome, RepeatRequired(false)))
    }

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError> {
        match std::fs::read_to_string(AUTO_UPGRADES_FILE) {
            Ok(content) if content.contains("\"1\"") => Ok(AutoOsPatchState::Enabled),
            Ok(_) => Ok(AutoOsPatchState::Disabled),
            Err(_) => Ok(AutoOsPatchState::Unknown),
        }
    }

    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError> {
        let backup_path = format!("{AUTO_UPGRADES_FILE}.bak");
        if let Ok(content) = std::fs::read_to_string(AUTO_UPGRADES_FILE) {
            let _ = std::fs::write(&backup_path, content);
        }
        std::fs::write(AUTO_UPGRADES_FILE, "APT::Periodic::Unattended-Upgrade \"0\";\n")
            .map_err(|e| PackageManagerError::InstallFailed(e.to_string()))
    }

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError> {
        Ok(std::path::Path::new(REBOOT_REQUIRED_FILE).exists())
    }
}

#[cfg(test)]
#[path = "apt_tests.rs"]
mod tests;
