// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_name_arch_version_line() {
    let nv = TdnfPackageManager::parse_check_update_line("glibc.x86_64 2.35-7.cm2 photon-updates").unwrap();
    assert_eq!(nv, NamedVersion::new("glibc", "2.35-7.cm2"));
}
