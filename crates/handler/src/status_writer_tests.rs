// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Utc;
use pk_core::Operation;

use super::*;

#[test]
fn writes_placeholder_when_no_status_file_exists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("1.status");
    write_initial_transitioning(&path, Operation::Assessment, Utc::now()).expect("write");
    assert!(path.exists());
    let contents = std::fs::read_to_string(&path).expect("read");
    assert!(contents.contains("transitioning"));
}

#[test]
fn does_not_overwrite_an_existing_status_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("1.status");
    std::fs::write(&path, "sentinel").expect("seed");
    write_initial_transitioning(&path, Operation::Assessment, Utc::now()).expect("write");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "sentinel");
}

#[test]
fn no_operation_success_status_is_terminal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("1.status");
    write_no_operation_success(&path, Utc::now()).expect("write");
    let contents = std::fs::read_to_string(&path).expect("read");
    assert!(contents.contains("success"));
    assert!(contents.contains("NoOperation"));
}
