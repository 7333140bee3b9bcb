// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ConfigurePatching` orchestration: apply the requested patch mode and
//! auto-assessment mode, and report the machine's resulting configuration.
//!
//! Unlike assessment/installation this operation has no package list to
//! truncate; it produces a single small summary, so it lives directly in
//! this crate rather than in the shared engine.

use pk_adapters::{AutoAssessmentService, AutoOsPatchState, PackageManager, PackageManagerError};
use pk_core::{ErrorCode, PatchModeSetting};
use pk_wire::{AutoAssessmentState, AutoAssessmentStatus, AutomaticOsPatchState, ConfigurePatchingSummary};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurePatchingOutcomeError {
    #[error("package manager failure while configuring patching: {0}")]
    PackageManager(#[from] PackageManagerError),
}

/// The summary alongside whether the run should be reported as an error.
/// A patch mode that resolves to an unknown auto-OS-update state after the
/// attempted change is a failure even though no call returned an `Err`.
pub struct ConfigurePatchingOutcome {
    pub summary: ConfigurePatchingSummary,
    pub failed: bool,
    pub error_code: Option<ErrorCode>,
}

/// Apply `patch_mode` to the platform's automatic-OS-update mechanism and
/// `assessment_mode` to the auto-assessment timer, then report the
/// resulting state of both.
///
/// `AutomaticByPlatform` disables the platform's own auto-update mechanism
/// (this extension becomes the sole driver of updates) and enables the
/// auto-assessment timer; `ImageDefault` leaves auto-update untouched and
/// disables the timer.
pub async fn run(
    package_manager: &dyn PackageManager,
    auto_assessment: &dyn AutoAssessmentService,
    patch_mode: PatchModeSetting,
    assessment_mode: PatchModeSetting,
    auto_assessment_cadence: std::time::Duration,
) -> Result<ConfigurePatchingOutcome, ConfigurePatchingOutcomeError> {
    let os_patch_state = match patch_mode {
        PatchModeSetting::AutomaticByPlatform => {
            package_manager.disable_auto_os_update().await?;
            package_manager.get_current_auto_os_patch_state().await?
        }
        PatchModeSetting::ImageDefault => package_manager.get_current_auto_os_patch_state().await?,
    };

    let auto_assessment_state = match assessment_mode {
        PatchModeSetting::AutomaticByPlatform => {
            let _ = auto_assessment.install(auto_assessment_cadence).await;
            match auto_assessment.enable().await {
                Ok(()) => AutoAssessmentState::Enabled,
                Err(_) => AutoAssessmentState::Unknown,
            }
        }
        PatchModeSetting::ImageDefault => match auto_assessment.disable().await {
            Ok(()) => AutoAssessmentState::Disabled,
            Err(_) => AutoAssessmentState::Unknown,
        },
    };

    let wire_os_patch_state = match os_patch_state {
        AutoOsPatchState::Enabled => AutomaticOsPatchState::Enabled,
        AutoOsPatchState::Disabled => AutomaticOsPatchState::Disabled,
        AutoOsPatchState::Unknown => AutomaticOsPatchState::Unknown,
    };

    let failed = matches!(os_patch_state, AutoOsPatchState::Unknown)
        && matches!(patch_mode, PatchModeSetting::AutomaticByPlatform);

    Ok(ConfigurePatchingOutcome {
        summary: ConfigurePatchingSummary {
            automatic_os_patch_state: wire_os_patch_state,
            auto_assessment_status: AutoAssessmentStatus { auto_assessment_state },
        },
        failed,
        error_code: failed.then_some(ErrorCode::PackageManagerFailure),
    })
}

#[cfg(test)]
#[path = "configure_patching_tests.rs"]
mod tests;
