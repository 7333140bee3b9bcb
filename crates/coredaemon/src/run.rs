// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The core process's top-level run: resolve paths and settings, confirm
//! single-instance liveness, dispatch on the requested operation, and
//! compose the resulting status.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use pk_adapters::{AutoAssessmentService, PackageManager, SystemdTimerService};
use pk_config::{
    discover_sequence_number, load_handler_environment, load_settings, MaskSet, RuntimeSettings,
};
use pk_core::{Classification, ErrorCode, Operation, PatchRecord, RebootStatus, StartedBy};
use pk_engine::{
    effective_classifications, filter_packages, run_assessment, run_installation, validate_classifications,
    InstallerConfig, MaintenanceWindow, RebootManager,
};
use pk_storage::{read_json_with_retry, write_json_with_retry, RetryPolicy};
use pk_wire::{CoreState, ExtState};
use tracing::{info, warn};

use crate::configure_patching;
use crate::distro;
use crate::error::CoreError;
use crate::family;
use crate::heartbeat;
use crate::liveness::{self, PriorInstance};
use crate::status_compose::compose_and_write;

const HANDLER_ENVIRONMENT_FILE: &str = "HandlerEnvironment.json";
const EXT_STATE_FILE: &str = "ExtState.json";
const CORE_STATE_FILE: &str = "CoreState.json";
const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";
const AUTO_ASSESSMENT_CADENCE: std::time::Duration = std::time::Duration::from_secs(3600);

/// Run one core invocation to completion. `settings_path` is the sequenced
/// settings document the handler passed as the sole positional argument;
/// `handler_env` is the directory the core was spawned with as its working
/// directory, where `HandlerEnvironment.json` lives.
pub async fn run(settings_path: &Path, handler_env: &Path) -> Result<(), CoreError> {
    let paths = load_handler_environment(&handler_env.join(HANDLER_ENVIRONMENT_FILE))?;

    let sequence_number = match sequence_number_from_settings_path(settings_path) {
        Some(number) => number,
        None => discover_sequence_number(&paths.config_dir)?,
    };
    let settings = load_settings(&paths.config_dir, sequence_number)?;

    let ext_state_path = paths.config_dir.join(EXT_STATE_FILE);
    if let Some(ext_state) = read_optional::<ExtState>(&ext_state_path)? {
        if ext_state.extension_sequence.number != sequence_number {
            warn!(
                ext_state_sequence = ext_state.extension_sequence.number,
                our_sequence = sequence_number,
                "ExtState names a different sequence than the one we were spawned for"
            );
        }
    }

    let core_state_path = paths.config_dir.join(CORE_STATE_FILE);
    let now = Utc::now();
    let prior_core_state = read_optional::<CoreState>(&core_state_path)?;
    match liveness::classify(prior_core_state.as_ref(), now, chrono::Duration::minutes(liveness::DEFAULT_STALENESS_MINUTES)) {
        PriorInstance::Alive => return Err(CoreError::AlreadyRunning(sequence_number)),
        PriorInstance::None | PriorInstance::Dead => {}
    }

    let mut core_state = CoreState::started(sequence_number, settings.operation, now, std::process::id());
    write_json_with_retry(&core_state_path, &core_state, RetryPolicy::default())?;
    let heartbeat_handle = heartbeat::spawn(core_state_path.clone());

    let family = family::detect(None).ok_or(CoreError::UnsupportedFamily)?;
    let package_manager = family::adapter_for(family);
    let distro = distro::detect();

    info!(?family, distro = %distro.name, version = %distro.version, operation = settings.operation.as_str(), "core run starting");

    let auto_assessment = SystemdTimerService::new(SYSTEMD_UNIT_DIR);
    let result = dispatch(
        package_manager.as_ref(),
        &auto_assessment,
        &settings,
        &distro,
        sequence_number,
        &paths.status_dir,
        now,
    )
    .await;

    core_state.mark_completed();
    let _ = write_json_with_retry(&core_state_path, &core_state, RetryPolicy::default());
    heartbeat_handle.abort();

    result
}

#[allow(clippy::too_many_arguments)]
async fn dispatch(
    package_manager: &dyn PackageManager,
    auto_assessment: &dyn AutoAssessmentService,
    settings: &RuntimeSettings,
    distro: &distro::DistroInfo,
    sequence_number: u64,
    status_dir: &Path,
    start_time: chrono::DateTime<Utc>,
) -> Result<(), CoreError> {
    let started_by = if settings.exec_auto_assess_only { StartedBy::Platform } else { StartedBy::User };

    match settings.operation {
        Operation::Assessment => {
            let summary = run_assessment(
                package_manager,
                settings.activity_id.clone(),
                &distro.name,
                &distro.version,
                start_time,
                Utc::now(),
                started_by,
            )
            .await;
            compose_and_write(status_dir, sequence_number, Operation::Assessment, Some(&summary), None, None)?;
            Ok(())
        }
        Operation::Installation => {
            let summary = run_install(package_manager, settings, distro, start_time).await?;

            // An installation run always finishes with a follow-up
            // assessment so the resulting status reflects what remains
            // outstanding after the install attempt.
            let assessment = run_assessment(
                package_manager,
                settings.activity_id.clone(),
                &distro.name,
                &distro.version,
                start_time,
                Utc::now(),
                started_by,
            )
            .await;

            compose_and_write(
                status_dir,
                sequence_number,
                Operation::Installation,
                Some(&assessment),
                Some(&summary),
                None,
            )?;
            Ok(())
        }
        Operation::ConfigurePatching => {
            // Assessment always runs first, platform-initiated, and is
            // reported alongside the configure-patching result.
            let assessment = run_assessment(
                package_manager,
                settings.activity_id.clone(),
                &distro.name,
                &distro.version,
                start_time,
                Utc::now(),
                StartedBy::Platform,
            )
            .await;

            let outcome = configure_patching::run(
                package_manager,
                auto_assessment,
                settings.patch_mode,
                settings.assessment_mode,
                AUTO_ASSESSMENT_CADENCE,
            )
            .await
            .map_err(|err| {
                warn!(%err, "configure patching failed");
                err
            })
            .ok();

            let outcome = outcome.unwrap_or(configure_patching::ConfigurePatchingOutcome {
                summary: pk_wire::ConfigurePatchingSummary {
                    automatic_os_patch_state: pk_wire::AutomaticOsPatchState::Unknown,
                    auto_assessment_status: pk_wire::AutoAssessmentStatus {
                        auto_assessment_state: pk_wire::AutoAssessmentState::Unknown,
                    },
                },
                failed: true,
                error_code: Some(ErrorCode::PackageManagerFailure),
            });

            compose_and_write(
                status_dir,
                sequence_number,
                Operation::ConfigurePatching,
                Some(&assessment),
                None,
                Some(&outcome),
            )?;
            Ok(())
        }
        Operation::NoOperation => {
            warn!("core was spawned for a NoOperation settings document; nothing to do");
            Ok(())
        }
    }
}

async fn run_install(
    package_manager: &dyn PackageManager,
    settings: &RuntimeSettings,
    distro: &distro::DistroInfo,
    start_time: chrono::DateTime<Utc>,
) -> Result<pk_engine::InstallationSummary, CoreError> {
    validate_classifications(&settings.classifications_to_include)?;
    let classifications = effective_classifications(package_manager.family(), &settings.classifications_to_include);

    let all = classify_candidates(package_manager, distro).await;

    let include_masks = MaskSet::compile(&settings.patches_to_include);
    let exclude_masks = MaskSet::compile(&settings.patches_to_exclude);
    let dependents = build_dependents_map(package_manager, &all).await;

    let filtered = filter_packages(&all, &classifications, &include_masks, &exclude_masks, &dependents);

    let reboot_pending = package_manager.is_reboot_pending().await.unwrap_or(false);
    let mut reboot_manager = RebootManager::new(settings.reboot_setting, RebootStatus::NotNeeded);
    reboot_manager.promote_stale_started_on_load();
    reboot_manager.observe_reboot_pending(reboot_pending);

    let window = MaintenanceWindow::new(settings.maintenance_window_minutes, start_time, settings.reboot_setting != pk_core::RebootSetting::Never);

    // Early reboot: a pending reboot found before the loop starts is worth
    // clearing now, while the whole window is still ahead of us, rather than
    // carrying it to the post-loop check.
    let before_reserve = window.remaining_minutes(Utc::now()) + pk_engine::REBOOT_RESERVE_MINUTES;
    if reboot_manager.should_reboot_now(before_reserve) {
        info!("reboot pending before installation loop; consuming it now");
        reboot_manager.mark_started();
    }

    let config = InstallerConfig::default();

    Ok(run_installation(
        package_manager,
        &window,
        &mut reboot_manager,
        filtered.included,
        filtered.excluded,
        filtered.not_included,
        &config,
        settings.activity_id.clone(),
        settings.maintenance_run_id.clone(),
        start_time,
        Utc::now,
    )
    .await)
}

/// Enumerate every available update and classify it, the same way
/// assessment does, so the installation filter has full classification
/// data to select against.
async fn classify_candidates(package_manager: &dyn PackageManager, distro: &distro::DistroInfo) -> Vec<PatchRecord> {
    let all = package_manager.get_all_updates(false).await.unwrap_or_default();
    let security = package_manager.get_security_updates().await.unwrap_or_default();

    all.iter()
        .map(|nv| {
            let is_security = security.iter().any(|s| s.name == nv.name);
            let classifications = if nv.version == pk_core::UA_ESM_REQUIRED {
                vec![Classification::SecurityEsm]
            } else if is_security {
                vec![Classification::Critical, Classification::Security]
            } else {
                vec![Classification::Other]
            };
            PatchRecord::new(&nv.name, &nv.version, &distro.name, &distro.version, classifications)
        })
        .collect()
}

async fn build_dependents_map(
    package_manager: &dyn PackageManager,
    candidates: &[PatchRecord],
) -> HashMap<String, Vec<String>> {
    let mut dependents = HashMap::with_capacity(candidates.len());
    for record in candidates {
        let deps = package_manager.get_dependents(&record.name).await.unwrap_or_default();
        dependents.insert(record.name.clone(), deps);
    }
    dependents
}

fn sequence_number_from_settings_path(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

fn read_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, CoreError> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(read_json_with_retry(path, RetryPolicy::default())?))
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
