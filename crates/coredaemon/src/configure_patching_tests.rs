// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pk_adapters::{AutoOsPatchState, FakeAutoAssessmentService, FakePackageManager, PackageManagerFamily};
use pk_wire::{AutoAssessmentState, AutomaticOsPatchState};

use super::*;

#[tokio::test]
async fn automatic_by_platform_disables_os_updates_and_enables_auto_assessment() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_auto_os_patch_state(AutoOsPatchState::Disabled);
    let timer = FakeAutoAssessmentService::new();

    let outcome = run(
        &pm,
        &timer,
        PatchModeSetting::AutomaticByPlatform,
        PatchModeSetting::AutomaticByPlatform,
        std::time::Duration::from_secs(3600),
    )
    .await
    .expect("run");

    assert!(pm.calls().contains(&pk_adapters::Call::DisableAutoOsUpdate));
    assert_eq!(outcome.summary.automatic_os_patch_state, AutomaticOsPatchState::Disabled);
    assert_eq!(outcome.summary.auto_assessment_status.auto_assessment_state, AutoAssessmentState::Enabled);
    assert!(!outcome.failed);
    assert!(timer.is_enabled().await.expect("is_enabled"));
}

#[tokio::test]
async fn image_default_leaves_os_updates_untouched_and_disables_auto_assessment() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_auto_os_patch_state(AutoOsPatchState::Enabled);
    let timer = FakeAutoAssessmentService::new();
    timer.set_active(true);

    let outcome = run(
        &pm,
        &timer,
        PatchModeSetting::ImageDefault,
        PatchModeSetting::ImageDefault,
        std::time::Duration::from_secs(3600),
    )
    .await
    .expect("run");

    assert!(!pm.calls().contains(&pk_adapters::Call::DisableAutoOsUpdate));
    assert_eq!(outcome.summary.automatic_os_patch_state, AutomaticOsPatchState::Enabled);
    assert_eq!(outcome.summary.auto_assessment_status.auto_assessment_state, AutoAssessmentState::Disabled);
    assert!(!outcome.failed);
}

#[tokio::test]
async fn unresolved_auto_os_patch_state_after_disable_is_reported_as_failed() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_auto_os_patch_state(AutoOsPatchState::Unknown);
    let timer = FakeAutoAssessmentService::new();

    let outcome = run(
        &pm,
        &timer,
        PatchModeSetting::AutomaticByPlatform,
        PatchModeSetting::ImageDefault,
        std::time::Duration::from_secs(3600),
    )
    .await
    .expect("run");

    assert_eq!(outcome.summary.automatic_os_patch_state, AutomaticOsPatchState::Unknown);
    assert!(outcome.failed);
    assert_eq!(outcome.error_code, Some(ErrorCode::PackageManagerFailure));
}
