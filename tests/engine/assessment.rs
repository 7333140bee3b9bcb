//! `pk_engine::run_assessment` against a `FakePackageManager`, covering the
//! classification rules and the CentOS-YUM missing-plugin-data fallback.

use pk_adapters::{FakePackageManager, NamedVersion, PackageManagerFamily};
use pk_core::{Classification, StartedBy};

#[tokio::test]
async fn classifies_security_updates_as_critical_and_security() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![NamedVersion::new("openssl", "3.0.2-1"), NamedVersion::new("vim", "2:9.0-1")]);
    pm.set_security_updates(vec![NamedVersion::new("openssl", "3.0.2-1")]);

    let now = chrono::Utc::now();
    let summary = pk_engine::run_assessment(&pm, "activity-1", "ubuntu", "22.04", now, now, StartedBy::User).await;

    let openssl = summary.patches.iter().find(|p| p.name == "openssl").expect("openssl present");
    assert!(openssl.classifications.contains(&Classification::Critical));
    assert!(openssl.classifications.contains(&Classification::Security));

    let vim = summary.patches.iter().find(|p| p.name == "vim").expect("vim present");
    assert_eq!(vim.classifications, vec![Classification::Other]);

    assert_eq!(summary.critical_and_security_patch_count(), 1);
    assert_eq!(summary.other_patch_count(), 1);
}

#[tokio::test]
async fn esm_sentinel_version_is_classified_security_esm() {
    let pm = FakePackageManager::new(PackageManagerFamily::Apt);
    pm.set_all_updates(vec![NamedVersion::new("libssl-esm", pk_core::UA_ESM_REQUIRED)]);

    let now = chrono::Utc::now();
    let summary = pk_engine::run_assessment(&pm, "activity-1", "ubuntu", "18.04", now, now, StartedBy::User).await;

    assert_eq!(summary.patches[0].classifications, vec![Classification::SecurityEsm]);
}

#[tokio::test]
async fn repository_refresh_failure_downgrades_status_to_warning_but_still_reports_patches() {
    let pm = FakePackageManager::new(PackageManagerFamily::Yum);
    pm.set_all_updates(vec![NamedVersion::new("httpd", "2.4.6-1")]);
    pm.set_refresh_failure("network unreachable");

    let now = chrono::Utc::now();
    let summary = pk_engine::run_assessment(&pm, "activity-1", "centos", "7", now, now, StartedBy::Platform).await;

    assert!(!summary.errors.is_empty());
    assert!(matches!(summary.status, pk_core::SubstatusState::Warning));
    assert_eq!(summary.patches.len(), 1);
}

#[tokio::test]
async fn get_all_updates_failure_reports_status_error_with_no_patches() {
    let pm = FailingAllUpdates;

    let now = chrono::Utc::now();
    let summary = pk_engine::run_assessment(&pm, "activity-1", "ubuntu", "22.04", now, now, StartedBy::User).await;

    assert!(summary.patches.is_empty());
    assert!(matches!(summary.status, pk_core::SubstatusState::Error));
}

/// A `PackageManager` double whose `get_all_updates` always fails, to drive
/// the early-return error path `FakePackageManager` has no builder for.
struct FailingAllUpdates;

#[async_trait::async_trait]
impl pk_adapters::PackageManager for FailingAllUpdates {
    fn family(&self) -> PackageManagerFamily {
        PackageManagerFamily::Apt
    }
    async fn refresh_repository(&self) -> Result<(), pk_adapters::PackageManagerError> {
        Ok(())
    }
    async fn get_all_updates(&self, _cached: bool) -> Result<Vec<NamedVersion>, pk_adapters::PackageManagerError> {
        Err(pk_adapters::PackageManagerError::QueryFailed("apt-get update failed".to_string()))
    }
    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, pk_adapters::PackageManagerError> {
        Ok(Vec::new())
    }
    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, pk_adapters::PackageManagerError> {
        Ok(Vec::new())
    }
    async fn get_all_available_versions(&self, _name: &str) -> Result<Vec<String>, pk_adapters::PackageManagerError> {
        Ok(Vec::new())
    }
    async fn is_package_version_installed(&self, _name: &str, _version: &str) -> Result<bool, pk_adapters::PackageManagerError> {
        Ok(false)
    }
    async fn get_dependents(&self, _name: &str) -> Result<Vec<String>, pk_adapters::PackageManagerError> {
        Ok(Vec::new())
    }
    async fn install_update_and_dependencies(
        &self,
        _names: &[NamedVersion],
        _simulate: bool,
    ) -> Result<(pk_adapters::InstallOutcome, pk_adapters::RepeatRequired), pk_adapters::PackageManagerError> {
        Ok((pk_adapters::InstallOutcome::Installed, pk_adapters::RepeatRequired(false)))
    }
    async fn get_current_auto_os_patch_state(&self) -> Result<pk_adapters::AutoOsPatchState, pk_adapters::PackageManagerError> {
        Ok(pk_adapters::AutoOsPatchState::Unknown)
    }
    async fn disable_auto_os_update(&self) -> Result<(), pk_adapters::PackageManagerError> {
        Ok(())
    }
    async fn is_reboot_pending(&self) -> Result<bool, pk_adapters::PackageManagerError> {
        Ok(false)
    }
}
