// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn spawns_and_returns_a_nonzero_pid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("1.settings");
    let pid = spawn_core_detached(Path::new("/bin/true"), dir.path(), &settings).expect("spawn");
    assert!(pid > 0);
}

#[test]
fn missing_binary_is_a_spawn_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("1.settings");
    let result = spawn_core_detached(Path::new("/nonexistent/patchextd"), dir.path(), &settings);
    assert!(result.is_err());
}
