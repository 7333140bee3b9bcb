// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RHEL/CentOS family adapter, driving `yum`/`rpm`/`needs-restarting`.
//!
//! Exit codes `{0, 1, 100}` from `yum check-update` are all non-error (100
//! means "updates are available").

use async_trait::async_trait;

use crate::package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};
use crate::process_runner::run_capture;

const YUM_CRON_CONF: &str = "/etc/yum/yum-cron.conf";

pub struct YumPackageManager;

impl YumPackageManager {
    pub fn new() -> Self {
        Self
    }

    fn is_nonerror_check_update_exit(code: Option<i32>) -> bool {
        matches!(code, Some(0) | Some(1) | Some(100))
    }

    /// Parses one line of `yum check-update` output, e.g. `bash.x86_64
    /// 4.2.46-34.el7 updates`.
    fn parse_check_update_line(line: &str) -> Option<NamedVersion> {
        let mut parts = line.split_whitespace();
        let name_arch = parts.next()?;
        let version = parts.next()?.to_string();
        let name = name_arch.rsplit_once('.').map(|(n, _)| n).unwrap_or(name_arch);
        Some(NamedVersion::new(name, version))
    }
}

impl Default for YumPackageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageManager for YumPackageManager {
    fn family(&self) -> PackageManagerFamily {
        PackageManagerFamily::Yum
    }

    async fn refresh_repository(&self) -> Result<(), PackageManagerError> {
        let output = run_capture("yum", &["makecache"]).await?;
        match output.status_code {
            Some(0) => Ok(()),
            _ => Err(PackageManagerError::RefreshFailed(output.combined())),
        }
    }

    async fn get_all_updates(&self, _cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("yum", &["check-update"]).await?;
        if !Self::is_nonerror_check_update_exit(output.status_code) {
            return Err(PackageManagerError::QueryFailed(output.combined()));
        }
        Ok(output.stdout.lines().filter_map(Self::parse_check_update_line).collect())
    }

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let output = run_capture("yum", &["check-update", "--security"]).await?;
        if !Self::is_nonerror_check_update_exit(output.status_code) {
            // Plugin data unavailable on this CentOS image: non-fatal for
            // assessment, the caller derives `Other = All` when this is empty.
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
        let output = run_capture("yum", &["--showduplicates", "list", "available", name]).await?;
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
        let output = run_capture("repoquery", &["--whatrequires", name]).await?;
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

        let output = run_capture("yum", &args).await?;
        let outcome = match output.status_code {
            Some(0) => InstallOutcome::Installed,
            _ if output.combined().to_lowercase().contains("nothing to do") => InstallOutcome::Installed,
            _ => InstallOutcome::Failed,
        };
        Ok((outcome, RepeatRequired(false)))
    }

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError> {
        match std::fs::metadata(YUM_CRON_CONF) {
            Ok(_) => Ok(AutoOsPatchState::Enabled),
            Err(_) => Ok(AutoOsPatchState::Unknown),
        }
    }

    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError> {
        let backup_path = format!("{YUM_CRON_CONF}.bak");
        if let Ok(content) = std::fs::read_to_string(YUM_CRON_CONF) {
            let _ = std::fs::write(&backup_path, content);
        }
        let _ = run_capture("systemctl", &["disable", "--now", "yum-cron"]).await?;
        Ok(())
    }

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError> {
        let output = run_capture("needs-restarting", &["-r"]).await?;
        Ok(output.status_code == Some(1))
    }
}

#[cfg(test)]
#[path = "yum_tests.rs"]
mod tests;
