// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image-based (Fedora CoreOS / rpm-ostree) family adapter.
//!
//! `rpm-ostree` layers packages into a new deployment rather than mutating
//! the running root; a successful `install` never makes a package
//! immediately active, so outcomes are `Pending` until the next boot
//! finalizes the deployment.

use async_trait::async_trait;

use crate::package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};
use crate::process_runner::run_capture;

pub struct RpmOstreePackageManager;

impl RpmOstreePackageManager {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RpmOstreePackageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageManager for RpmOstreePackageManager {
    fn family(&self) -> PackageManagerFamily {
        PackageManagerFamily::RpmOstree
    }

    async fn refresh_repository(&self) -> Result<(), PackageManagerError> {
        let output = run_capture("rpm-ostree", &["refresh-md"]).await?;
        match output.status_code {
            Some(0) => Ok(()),
            _ => Err(PackageManagerError::RefreshFailed(output.combined())),
        }
    }

    async fn get_all_updates(&self, _cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("rpm-ostree", &["upgrade", "--check", "--format=json"]).await?;
        parse_upgrade_check_json(&output.stdout)
    }

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        // rpm-ostree's upgrade check does not classify by severity.
        Ok(Vec::new())
    }

    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        self.get_all_updates(false).await
    }

    async fn get_all_available_versions(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let output = run_capture("rpm-ostree", &["db", "list", name]).await?;
        Ok(output.stdout.lines().map(|line| line.trim().to_string()).filter(|l| !l.is_empty()).collect())
    }

    async fn is_package_version_installed(
        &self,
        name: &str,
        version: &str,
    ) -> Result<bool, PackageManagerError> {
        let output = run_capture("rpm", &["-q", "--qf=%{VERSION}-%{RELEASE}", name]).await?;
        Ok(output.status_code == Some(0) && output.stdout.trim() == version)
    }

    async fn get_dependents(&self, _name: &str) -> Result<Vec<String>, PackageManagerError> {
        // Dependency resolution happens inside the ostree transaction; the
        // orchestrator's dependency-set tracking is a no-op for this family.
        Ok(Vec::new())
    }

    async fn install_update_and_dependencies(
        &self,
        names: &[NamedVersion],
        simulate: bool,
    ) -> Result<(InstallOutcome, RepeatRequired), PackageManagerError> {
        if names.is_empty() {
            return Ok((InstallOutcome::Excluded, RepeatRequired(false)));
        }
        let mut args = vec!["install"];
        if simulate {
            args.push("--dry-run");
        }
        let package_names: Vec<&str> = names.iter().map(|nv| nv.name.as_str()).collect();
        args.extend(package_names);

        let output = run_capture("rpm-ostree", &args).await?;
        let outcome = match output.status_code {
            Some(0) if simulate => InstallOutcome::Pending,
            Some(0) => InstallOutcome::Pending,
            _ => InstallOutcome::Failed,
        };
        Ok((outcome, RepeatRequired(false)))
    }

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError> {
        let output = run_capture("systemctl", &["is-enabled", "rpm-ostreed-automatic.timer"]).await?;
        Ok(match output.stdout.trim() {
            "enabled" => AutoOsPatchState::Enabled,
            "disabled" => AutoOsPatchState::Disabled,
            _ => AutoOsPatchState::Unknown,
        })
    }

    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError> {
        let _ = run_capture("systemctl", &["disable", "--now", "rpm-ostreed-automatic.timer"]).await?;
        Ok(())
    }

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError> {
        // A staged deployment not yet booted into is always a pending reboot.
        let output = run_capture("rpm-ostree", &["status", "--json"]).await?;
        Ok(output.stdout.contains("\"staged\": true") || output.stdout.contains("\"staged\":true"))
    }
}

fn parse_upgrade_check_json(stdout: &str) -> Result<Vec<NamedVersion>, PackageManagerError> {
    #[derive(serde::Deserialize)]
    struct UpgradeCheck {
        #[serde(default, rename = "AvailableUpdate")]
        available_update: Option<AvailableUpdate>,
    }
    #[derive(serde::Deserialize)]
    struct AvailableUpdate {
        #[serde(default, rename = "RpmDiff")]
        rpm_diff: Option<RpmDiff>,
    }
    #[derive(serde::Deserialize)]
    struct RpmDiff {
        #[serde(default)]
        upgraded: Vec<RpmDelta>,
    }
    #[derive(serde::Deserialize)]
    struct RpmDelta {
        name: String,
        #[serde(rename = "to_version")]
        to_version: String,
    }

    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: UpgradeCheck = serde_json::from_str(stdout)
        .map_err(|e| PackageManagerError::QueryFailed(e.to_string()))?;
    Ok(parsed
        .available_update
        .and_then(|u| u.rpm_diff)
        .map(|diff| diff.upgraded.into_iter().map(|d| NamedVersion::new(d.name, d.to_version)).collect())
        .unwrap_or_default())
}

#[cfg(test)]
#[path = "rpm_ostree_tests.rs"]
mod tests;
