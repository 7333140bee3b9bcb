// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The installation orchestrator: the per-package loop that drives
//! package-manager installs within the maintenance window, with dependency
//! crediting, periodic reconciliation, and repeat-operation signaling.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pk_adapters::{InstallOutcome, NamedVersion, PackageManager, PackageManagerError, PackageManagerFamily};
use pk_core::{ErrorCode, PatchInstallationState, PatchRecord, RebootStatus, UA_ESM_REQUIRED};

use crate::maintenance_window::MaintenanceWindow;
use crate::reboot_manager::RebootManager;
use crate::status_truncation::ErrorLog;

/// Number of successful parent installs between reconciliation passes.
pub const DEFAULT_RECONCILE_EVERY: usize = 10;
/// Maximum install attempts for a given package (and its dependency set).
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// The manager-updated-itself signal (ZYPPER exit 103) is tolerated this
/// many times before being treated as a hard failure.
const MAX_REPEATS: u32 = 2;

pub struct InstallerConfig {
    pub max_retries: u32,
    pub retry_backoff_unit: Duration,
    pub reconcile_every: usize,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_unit: Duration::from_secs(1),
            reconcile_every: DEFAULT_RECONCILE_EVERY,
        }
    }
}

pub struct InstallationSummary {
    pub installation_activity_id: String,
    pub reboot_status: RebootStatus,
    pub maintenance_window_exceeded: bool,
    pub patches: Vec<PatchRecord>,
    pub start_time: DateTime<Utc>,
    pub last_modified_time: DateTime<Utc>,
    pub maintenance_run_id: Option<String>,
    pub errors: Vec<crate::status_truncation::ErrorEntry>,
    pub overall_success: bool,
}

impl InstallationSummary {
    pub fn count(&self, state: PatchInstallationState) -> usize {
        self.patches.iter().filter(|p| p.patch_installation_state == Some(state)).count()
    }
}

/// Run the installation loop over `included` (already filtered, in
/// `Pending` state), against `all_still_needed` (names present in the
/// latest full update listing, used to detect silently-installed
/// dependents). `not_included`/`excluded` are carried through unchanged as
/// terminal records.
#[allow(clippy::too_many_arguments)]
pub async fn run_installation(
    package_manager: &dyn PackageManager,
    window: &MaintenanceWindow,
    reboot_manager: &mut RebootManager,
    included: Vec<PatchRecord>,
    excluded: Vec<PatchRecord>,
    not_included: Vec<PatchRecord>,
    config: &InstallerConfig,
    activity_id: impl Into<String>,
    maintenance_run_id: Option<String>,
    start_time: DateTime<Utc>,
    now: impl Fn() -> DateTime<Utc>,
) -> InstallationSummary {
    let activity_id = activity_id.into();
    let mut errors = ErrorLog::new();
    let mut maintenance_window_exceeded = false;
    let mut overall_success = true;

    let mut all_still_needed: HashSet<String> =
        match package_manager.get_all_updates(true).await {
            Ok(updates) => updates.into_iter().map(|nv| nv.name).collect(),
            Err(err) => {
                errors.push(ErrorCode::PackageManagerFailure, err.to_string());
                HashSet::new()
            }
        };

    let mut finished: Vec<PatchRecord> = Vec::with_capacity(included.len());
    let mut repeats: u32 = 0;
    let mut remaining: Vec<PatchRecord> = included;
    let mut attempted_since_reconcile = 0usize;

    'repeat_loop: loop {
        let mut next_round = Vec::new();

        for mut record in std::mem::take(&mut remaining) {
            if maintenance_window_exceeded {
                next_round.push(record);
                continue;
            }

            if !window.is_package_install_time_available(now()) {
                maintenance_window_exceeded = true;
                errors.push(ErrorCode::OperationFailed, "maintenance window exhausted before all packages installed");
                next_round.push(record);
                continue;
            }

            if record.version == UA_ESM_REQUIRED {
                finished.push(record.with_state(PatchInstallationState::NotSelected));
                continue;
            }

            let dependency_set = build_dependency_set(package_manager, &record.name, &all_still_needed, package_manager.family()).await;
            let names: Vec<NamedVersion> = std::iter::once(NamedVersion::new(record.name.clone(), record.version.clone()))
                .chain(dependency_set.iter().map(|name| NamedVersion::new(name.clone(), String::new())))
                .collect();

            let mut outcome = InstallOutcome::Failed;
            let mut fatal = false;
            for attempt in 0..=config.max_retries {
                match package_manager.install_update_and_dependencies(&names, false).await {
                    Ok((result, repeat_required)) => {
                        outcome = result;
                        if repeat_required.0 {
                            repeats += 1;
                        }
                        if matches!(outcome, InstallOutcome::Installed | InstallOutcome::Pending) {
                            break;
                        }
                    }
                    Err(PackageManagerError::NotHealthy { detail, .. }) => {
                        errors.push(ErrorCode::PackageManagerFailure, detail);
                        fatal = true;
                        break;
                    }
                    Err(err) => {
                        errors.push(ErrorCode::PackageManagerFailure, err.to_string());
                    }
                }
                if attempt < config.max_retries && !config.retry_backoff_unit.is_zero() {
                    tokio::time::sleep(config.retry_backoff_unit * (attempt + 1)).await;
                }
            }

            if fatal {
                overall_success = false;
                record = record.with_state(PatchInstallationState::Failed);
                finished.push(record);
                for remaining_record in next_round {
                    finished.push(remaining_record.with_state(PatchInstallationState::Failed));
                }
                for remaining_record in std::mem::take(&mut remaining) {
                    finished.push(remaining_record.with_state(PatchInstallationState::Failed));
                }
                break 'repeat_loop;
            }

            let pending = package_manager.is_reboot_pending().await.unwrap_or(false);
            reboot_manager.observe_reboot_pending(pending);

            let state = match outcome {
                InstallOutcome::Installed => PatchInstallationState::Installed,
                InstallOutcome::Pending => PatchInstallationState::Pending,
                InstallOutcome::Excluded => PatchInstallationState::Excluded,
                InstallOutcome::Failed => {
                    overall_success = false;
                    PatchInstallationState::Failed
                }
            };
            finished.push(record.clone().with_state(state));

            if state == PatchInstallationState::Installed {
                all_still_needed.remove(&record.name);
                attempted_since_reconcile += 1;
            }
            // Dependency credit for packages no longer in `all_still_needed` is
            // handled by `reconcile`, which only detects the case where the
            // latest available version was the one installed; it is a
            // fallback, not a substitute for explicit dependency tracking here.

            if attempted_since_reconcile >= config.reconcile_every {
                reconcile(package_manager, &mut all_still_needed, &mut finished).await;
                attempted_since_reconcile = 0;
            }
        }

        remaining = next_round;
        if remaining.is_empty() {
            break;
        }
        if repeats > 0 && repeats <= MAX_REPEATS {
            continue;
        }
        if repeats > MAX_REPEATS {
            errors.push(ErrorCode::PackageManagerFailure, "package manager required more repeats than permitted");
            overall_success = false;
            for record in remaining {
                finished.push(record.with_state(PatchInstallationState::Failed));
            }
        } else {
            for record in remaining {
                finished.push(record);
            }
        }
        break;
    }

    reconcile(package_manager, &mut all_still_needed, &mut finished).await;

    if !maintenance_window_exceeded {
        let before_reserve = window.remaining_minutes(now()) + crate::maintenance_window::REBOOT_RESERVE_MINUTES;
        if reboot_manager.should_reboot_now(before_reserve) {
            reboot_manager.mark_started();
        }
    }

    let mut patches = excluded;
    patches.extend(not_included);
    patches.extend(finished);

    overall_success = overall_success && !maintenance_window_exceeded;

    InstallationSummary {
        installation_activity_id: activity_id,
        reboot_status: reboot_manager.status(),
        maintenance_window_exceeded,
        patches,
        start_time,
        last_modified_time: now(),
        maintenance_run_id,
        errors: errors.entries().to_vec(),
        overall_success,
    }
}

/// Dependency set for `name`: only dependents still present in
/// `all_still_needed`, plus (for the YUM family) sibling-architecture
/// packages sharing the same product name, deduplicated preserving order.
async fn build_dependency_set(
    package_manager: &dyn PackageManager,
    name: &str,
    all_still_needed: &HashSet<String>,
    family: PackageManagerFamily,
) -> Vec<String> {
    let dependents = package_manager.get_dependents(name).await.unwrap_or_default();
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for dep in dependents {
        if all_still_needed.contains(&dep) && seen.insert(dep.clone()) {
            result.push(dep);
        }
    }
    if family == PackageManagerFamily::Yum {
        let product = name.split('.').next().unwrap_or(name);
        for candidate in all_still_needed {
            let candidate_product = candidate.split('.').next().unwrap_or(candidate);
            if candidate_product == product && candidate != name && seen.insert(candidate.clone()) {
                result.push(candidate.clone());
            }
        }
    }
    result
}

/// Full reconciliation pass: re-query the update listing and credit any
/// `Pending` package that is no longer present as `Installed`.
async fn reconcile(
    package_manager: &dyn PackageManager,
    all_still_needed: &mut HashSet<String>,
    finished: &mut [PatchRecord],
) {
    if let Ok(updates) = package_manager.get_all_updates(false).await {
        *all_still_needed = updates.into_iter().map(|nv| nv.name).collect();
    }
    for record in finished.iter_mut() {
        if record.patch_installation_state == Some(PatchInstallationState::Pending)
            && !all_still_needed.contains(&record.name)
        {
            record.patch_installation_state = Some(PatchInstallationState::Installed);
        }
    }
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
