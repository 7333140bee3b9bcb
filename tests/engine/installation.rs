//! `pk_engine::run_installation` against a `FakePackageManager`: the
//! filter-then-install pipeline, retry/backoff, maintenance-window
//! exhaustion, and reboot handling.

use std::collections::HashMap;

use chrono::Utc;
use pk_adapters::{FakePackageManager, InstallOutcome, NamedVersion, PackageManager, PackageManagerFamily, RepeatRequired};
use pk_config::MaskSet;
use pk_core::{Classification, PatchInstallationState, PatchRecord, RebootSetting, RebootStatus};
use pk_engine::{filter_packages, InstallerConfig, MaintenanceWindow, RebootManager};

fn candidate(name: &str, version: &str, classification: Classification) -> PatchRecord {
    PatchRecord::new(name, version, "ubuntu", "22.04", vec![classification])
}

fn fast_config() -> InstallerConfig {
    InstallerConfig { max_retries: 1, retry_backoff_unit: std::time::Duration::ZERO, reconcile_every: 10 }
}

#[tokio::test]
async fn installs_selected_packages_and_leaves_others_not_selected() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![NamedVersion::new("openssl", "3.0.2-1")]);

    let all = vec![candidate("openssl", "3.0.2-1", Classification::Critical), candidate("vim", "2:9.0-1", Classification::Other)];
    let filtered = filter_packages(&all, &[Classification::Critical], &MaskSet::compile(&[]), &MaskSet::compile(&[]), &HashMap::new());
    assert_eq!(filtered.included.len(), 1);
    assert_eq!(filtered.not_included.len(), 1);

    let window = MaintenanceWindow::new(120, Utc::now(), false);
    let mut reboot_manager = RebootManager::new(RebootSetting::IfRequired, RebootStatus::NotNeeded);

    let summary = pk_engine::run_installation(
        &pm,
        &window,
        &mut reboot_manager,
        filtered.included,
        filtered.excluded,
        filtered.not_included,
        &fast_config(),
        "activity-1",
        None,
        Utc::now(),
        Utc::now,
    )
    .await;

    assert_eq!(summary.count(PatchInstallationState::Installed), 1);
    assert_eq!(summary.count(PatchInstallationState::NotSelected), 1);
    assert!(summary.overall_success);
}

#[tokio::test]
async fn exclude_mask_also_excludes_the_dependency_that_matched_it() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![NamedVersion::new("libfoo", "1.0-1"), NamedVersion::new("foo-tools", "1.0-1")]);

    let all = vec![candidate("libfoo", "1.0-1", Classification::Other), candidate("foo-tools", "1.0-1", Classification::Other)];
    let mut dependents = HashMap::new();
    dependents.insert("libfoo".to_string(), vec!["foo-tools".to_string()]);

    let exclude = MaskSet::compile(&["foo-tools".to_string()]);
    let filtered = filter_packages(&all, &[Classification::Other], &MaskSet::compile(&[]), &exclude, &dependents);

    assert_eq!(filtered.included.len(), 0);
    assert_eq!(filtered.excluded.len(), 2);
}

#[tokio::test]
async fn retries_a_failing_install_up_to_max_retries_then_marks_it_failed() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![]);
    // Burn the fake's default `Installed` queue entry so `Failed` repeats
    // for every subsequent install attempt.
    let _ = pm.install_update_and_dependencies(&[], false).await;
    pm.queue_install_outcome(InstallOutcome::Failed, RepeatRequired(false));

    let included = vec![candidate("broken-pkg", "1.0-1", Classification::Other).with_state(PatchInstallationState::Pending)];
    let window = MaintenanceWindow::new(120, Utc::now(), false);
    let mut reboot_manager = RebootManager::new(RebootSetting::Never, RebootStatus::NotNeeded);

    let summary = pk_engine::run_installation(
        &pm,
        &window,
        &mut reboot_manager,
        included,
        vec![],
        vec![],
        &fast_config(),
        "activity-1",
        None,
        Utc::now(),
        Utc::now,
    )
    .await;

    assert_eq!(summary.count(PatchInstallationState::Failed), 1);
    assert!(!summary.overall_success);
    // One of these calls is the throwaway burn above; the rest are the
    // installer's own attempts (max_retries + 1).
    let attempts = pm.calls().iter().filter(|c| matches!(c, pk_adapters::Call::InstallUpdateAndDependencies { .. })).count();
    assert_eq!(attempts, (fast_config().max_retries + 1) as usize + 1);
}

#[tokio::test]
async fn maintenance_window_already_exhausted_marks_remaining_packages_not_installed() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![]);

    let included = vec![candidate("a-pkg", "1.0-1", Classification::Other).with_state(PatchInstallationState::Pending)];
    // A window that started far enough in the past that no time remains.
    let window = MaintenanceWindow::new(5, Utc::now() - chrono::Duration::minutes(30), false);
    let mut reboot_manager = RebootManager::new(RebootSetting::Never, RebootStatus::NotNeeded);

    let summary = pk_engine::run_installation(
        &pm,
        &window,
        &mut reboot_manager,
        included,
        vec![],
        vec![],
        &fast_config(),
        "activity-1",
        None,
        Utc::now(),
        Utc::now,
    )
    .await;

    assert!(summary.maintenance_window_exceeded);
    assert!(!summary.overall_success);
    assert!(pm.calls().iter().all(|c| !matches!(c, pk_adapters::Call::InstallUpdateAndDependencies { .. })));
}

#[tokio::test]
async fn a_reboot_pending_at_the_end_of_the_run_transitions_reboot_status_to_started() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![]);
    pm.set_reboot_pending(true);

    let included = vec![candidate("kernel", "5.15-1", Classification::Critical).with_state(PatchInstallationState::Pending)];
    let window = MaintenanceWindow::new(120, Utc::now(), true);
    let mut reboot_manager = RebootManager::new(RebootSetting::IfRequired, RebootStatus::NotNeeded);

    let summary = pk_engine::run_installation(
        &pm,
        &window,
        &mut reboot_manager,
        included,
        vec![],
        vec![],
        &fast_config(),
        "activity-1",
        None,
        Utc::now(),
        Utc::now,
    )
    .await;

    assert_eq!(summary.reboot_status, RebootStatus::Started);
}
