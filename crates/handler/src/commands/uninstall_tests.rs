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
fn removes_existing_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = paths_under(dir.path());
    crate::commands::install::run(&paths).expect("install");
    run(&paths).expect("uninstall");
    assert!(!paths.config_dir.exists());
}

#[test]
fn missing_directories_are_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = paths_under(dir.path());
    run(&paths).expect("uninstall of never-installed extension");
}
