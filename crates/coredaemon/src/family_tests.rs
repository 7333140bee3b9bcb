// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn fixture_path_with(dir: &std::path::Path, binaries: &[&str]) -> String {
    for binary in binaries {
        std::fs::write(dir.join(binary), "#!/bin/sh\n").expect("write fixture binary");
    }
    dir.display().to_string()
}

#[test]
fn detects_zypper_before_yum_when_both_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = fixture_path_with(dir.path(), &["zypper", "yum"]);
    assert_eq!(detect(Some(&path)), Some(PackageManagerFamily::Zypper));
}

#[test]
fn detects_apt() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = fixture_path_with(dir.path(), &["apt-get"]);
    assert_eq!(detect(Some(&path)), Some(PackageManagerFamily::Apt));
}

#[test]
fn no_known_binary_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().display().to_string();
    assert_eq!(detect(Some(&path)), None);
}
