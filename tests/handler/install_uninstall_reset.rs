//! `install`/`uninstall`/`reset`: pure filesystem lifecycle, no core process
//! involved.

use crate::support::Extension;
use pk_core::Operation;

#[test]
fn install_creates_every_declared_directory() {
    let ext = Extension::new();

    ext.patchext().arg("install").assert().success();

    assert!(ext.config_dir().is_dir());
    assert!(ext.status_dir().is_dir());
    assert!(ext.log_dir().is_dir());
    assert!(ext.events_dir().is_dir());
}

#[test]
fn install_is_idempotent() {
    let ext = Extension::installed();

    ext.patchext().arg("install").assert().success();

    assert!(ext.config_dir().is_dir());
}

#[test]
fn uninstall_removes_every_directory_install_created() {
    let ext = Extension::installed();

    ext.patchext().arg("uninstall").assert().success();

    assert!(!ext.config_dir().exists());
    assert!(!ext.status_dir().exists());
    assert!(!ext.log_dir().exists());
    assert!(!ext.events_dir().exists());
}

#[test]
fn uninstall_on_a_never_installed_extension_is_not_an_error() {
    let ext = Extension::new();

    ext.patchext().arg("uninstall").assert().success();
}

#[test]
fn reset_drops_state_files_but_recreates_the_directory_layout() {
    let ext = Extension::installed();
    ext.write_settings(1, Operation::Assessment);
    ext.write_ext_state(&crate::support::ext_state(1, chrono::Utc::now(), Operation::Assessment));
    ext.write_core_state(&crate::support::live_core_state(1, Operation::Assessment, chrono::Utc::now()));
    std::fs::write(ext.status_dir().join("1.status"), "[]").expect("seed status file");

    ext.patchext().arg("reset").assert().success();

    assert!(ext.config_dir().is_dir());
    assert!(ext.status_dir().is_dir());
    assert!(!ext.config_dir().join("ExtState.json").exists());
    assert!(!ext.config_dir().join("CoreState.json").exists());
    assert!(read_dir_is_empty(&ext.status_dir()));
    // The settings document is host-agent-provided, not extension state;
    // reset only clears ExtState/CoreState/status.
    assert!(ext.config_dir().join("1.settings").exists());
}

fn read_dir_is_empty(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).expect("read_dir").next().is_none()
}
