// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability interface the installation and assessment orchestrators
//! consume, abstracting one adapter per package-manager family.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManagerFamily {
    Apt,
    Yum,
    Zypper,
    Tdnf,
    RpmOstree,
}

impl PackageManagerFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManagerFamily::Apt => "apt",
            PackageManagerFamily::Yum => "yum",
            PackageManagerFamily::Zypper => "zypper",
            PackageManagerFamily::Tdnf => "tdnf",
            PackageManagerFamily::RpmOstree => "rpm-ostree",
        }
    }
}

/// Outcome of one install attempt against a package (and its dependency
/// set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    Failed,
    Pending,
    Excluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoOsPatchState {
    Enabled,
    Disabled,
    Unknown,
}

/// A package name paired with the version the adapter reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedVersion {
    pub name: String,
    pub version: String,
}

impl NamedVersion {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }
}

#[derive(Debug, Error)]
pub enum PackageManagerError {
    #[error("repository refresh failed: {0}")]
    RefreshFailed(String),
    #[error("{family} is not healthy and cannot proceed: {detail}")]
    NotHealthy { family: &'static str, detail: String },
    #[error("install invocation failed: {0}")]
    InstallFailed(String),
    #[error("query invocation failed: {0}")]
    QueryFailed(String),
    #[error("failed to spawn {binary}: {source}")]
    Spawn { binary: &'static str, #[source] source: std::io::Error },
}

/// Whether `self` was reported by the package-manager adapter as itself
/// having been updated mid-run and requiring a repeat of the install loop
/// (the ZYPPER exit-103 pattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatRequired(pub bool);

/// Capability surface one family adapter must implement. Mirrors the
/// teacher's notification-adapter trait shape: `async_trait`, cheaply
/// `Clone`-able, object-safe enough to be shared behind an `Arc`.
#[async_trait]
pub trait PackageManager: Send + Sync + 'static {
    fn family(&self) -> PackageManagerFamily;

    async fn refresh_repository(&self) -> Result<(), PackageManagerError>;

    async fn get_all_updates(&self, cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError>;

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError>;

    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError>;

    async fn get_all_available_versions(&self, name: &str) -> Result<Vec<String>, PackageManagerError>;

    async fn is_package_version_installed(&self, name: &str, version: &str) -> Result<bool, PackageManagerError>;

    async fn get_dependents(&self, name: &str) -> Result<Vec<String>, PackageManagerError>;

    /// Attempt to install `names` (at the paired `versions`) and their
    /// dependencies. `simulate` requests a dry run where the adapter
    /// supports one.
    async fn install_update_and_dependencies(
        &self,
        names: &[NamedVersion],
        simulate: bool,
    ) -> Result<(InstallOutcome, RepeatRequired), PackageManagerError>;

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError>;

    /// Disable the platform's own automatic-OS-update mechanism, leaving a
    /// `.bak` artifact an operator (or `update`) can restore from.
    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError>;

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError>;
}

#[cfg(test)]
#[path = "package_manager_tests.rs"]
mod tests;
