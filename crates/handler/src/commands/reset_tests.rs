// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pk_config::ExtensionPaths;

use super::*;

fn paths_under(root: &std::path::Path) -> ExtensionPaths {
    ExtensionPaths {
        config_dir: root.join("config"),
        status_dir: root.join("status"),
        log_dir: root.join("log"),
        events_dir: root.join("events"),
    }
}

#[test]
fn removes_state_files_but_recreates_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = paths_under(dir.path());
    crate::commands::install::run(&paths).expect("install");
    std::fs::write(paths.config_dir.join(EXT_STATE_FILE), "{}").expect("write ExtState");
    std::fs::write(paths.config_dir.join(CORE_STATE_FILE), "{}").expect("write CoreState");
    std::fs::write(paths.status_dir.join("1.status"), "[]").expect("write status");

    run(&paths).expect("reset");

    assert!(!paths.config_dir.join(EXT_STATE_FILE).exists());
    assert!(!paths.config_dir.join(CORE_STATE_FILE).exists());
    assert!(paths.status_dir.read_dir().expect("read status dir").next().is_none());
    assert!(paths.config_dir.is_dir());
    assert!(paths.status_dir.is_dir());
}

#[test]
fn is_a_no_op_on_a_never_installed_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = paths_under(dir.path());
    run(&paths).expect("reset of never-installed extension");
}
