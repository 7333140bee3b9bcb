// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package-manager family detection: probes `PATH` for the family's own
//! binary, in the same priority order `pk_adapters::PackageManagerFamily`
//! enumerates its variants, and constructs the matching adapter.

use pk_adapters::{
    AptPackageManager, PackageManager, PackageManagerFamily, RpmOstreePackageManager,
    TdnfPackageManager, YumPackageManager, ZypperPackageManager,
};

/// One `(family, binary name)` pair, checked in priority order. Families
/// that could plausibly coexist on one host (e.g. `tdnf` alongside `yum`'s
/// legacy shim) are ordered with the more specific binary first.
const CANDIDATES: &[(PackageManagerFamily, &str)] = &[
    (PackageManagerFamily::Zypper, "zypper"),
    (PackageManagerFamily::Tdnf, "tdnf"),
    (PackageManagerFamily::RpmOstree, "rpm-ostree"),
    (PackageManagerFamily::Yum, "yum"),
    (PackageManagerFamily::Apt, "apt-get"),
];

fn binary_on_path(name: &str) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else { return false };
    std::env::split_paths(&path_var).any(|dir| dir.join(name).is_file())
}

/// Detect which family is installed on this host by probing `PATH`, using
/// `search_paths` instead of the real `PATH` when given (unit tests pass a
/// fixture directory rather than depending on the test host's own package
/// manager).
pub fn detect(override_path: Option<&str>) -> Option<PackageManagerFamily> {
    match override_path {
        Some(dirs) => CANDIDATES.iter().find_map(|(family, binary)| {
            std::env::split_paths(dirs).any(|dir| dir.join(binary).is_file()).then_some(*family)
        }),
        None => CANDIDATES.iter().find_map(|(family, binary)| binary_on_path(binary).then_some(*family)),
    }
}

pub fn adapter_for(family: PackageManagerFamily) -> Box<dyn PackageManager> {
    match family {
        PackageManagerFamily::Apt => Box::new(AptPackageManager::new()),
        PackageManagerFamily::Yum => Box::new(YumPackageManager::new()),
        PackageManagerFamily::Zypper => Box::new(ZypperPackageManager::new()),
        PackageManagerFamily::Tdnf => Box::new(TdnfPackageManager::new()),
        PackageManagerFamily::RpmOstree => Box::new(RpmOstreePackageManager::new()),
    }
}

#[cfg(test)]
#[path = "family_tests.rs"]
mod tests;
