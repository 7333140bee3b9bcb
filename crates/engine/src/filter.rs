// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package selection: classification filter, include/exclude masks, and the
//! per-family classification-widening workaround.

use std::collections::HashMap;

use pk_adapters::PackageManagerFamily;
use pk_config::MaskSet;
use pk_core::{Classification, PatchInstallationState, PatchRecord};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("cannot combine the Unclassified sentinel with a real classification")]
    InvalidClassificationCombination,
}

pub fn validate_classifications(requested: &[Classification]) -> Result<(), FilterError> {
    let has_unclassified = requested.contains(&Classification::Unclassified);
    let has_real = requested.iter().any(|c| *c != Classification::Unclassified);
    if has_unclassified && has_real {
        return Err(FilterError::InvalidClassificationCombination);
    }
    Ok(())
}

/// CentOS-YUM sometimes has no classification plugin data; when both
/// Critical and Security are requested there, widen the effective set to
/// everything rather than silently matching nothing. Returns a new vec;
/// never mutates the caller's input.
pub fn effective_classifications(
    family: PackageManagerFamily,
    requested: &[Classification],
) -> Vec<Classification> {
    let both_critical_and_security =
        requested.contains(&Classification::Critical) && requested.contains(&Classification::Security);
    if family != PackageManagerFamily::Yum || !both_critical_and_security {
        return requested.to_vec();
    }
    let mut widened = requested.to_vec();
    for extra in [Classification::Other, Classification::Unclassified] {
        if !widened.contains(&extra) {
            widened.push(extra);
        }
    }
    widened
}

pub struct FilteredPackages {
    pub included: Vec<PatchRecord>,
    pub excluded: Vec<PatchRecord>,
    pub not_included: Vec<PatchRecord>,
}

/// Apply the classification filter and include/exclude masks to `all`.
///
/// `dependents` maps a package name to the names of packages that depend on
/// it, used so an exclude mask matching a dependency also excludes its
/// parent.
pub fn filter_packages(
    all: &[PatchRecord],
    classifications: &[Classification],
    include_masks: &MaskSet,
    exclude_masks: &MaskSet,
    dependents: &HashMap<String, Vec<String>>,
) -> FilteredPackages {
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    let mut not_included = Vec::new();

    for record in all {
        let classification_match = record.classifications.iter().any(|c| classifications.contains(c));
        let name_match = include_masks.matches(&record.name);
        let selected = classification_match || name_match;

        if !selected {
            not_included.push(record.clone().with_state(PatchInstallationState::NotSelected));
            continue;
        }

        let dependency_excluded = dependents
            .get(&record.name)
            .into_iter()
            .flatten()
            .any(|dep| exclude_masks.matches(dep));
        let is_excluded = exclude_masks.matches(&record.name) || dependency_excluded;

        if is_excluded {
            excluded.push(record.clone().with_state(PatchInstallationState::Excluded));
        } else {
            included.push(record.clone().with_state(PatchInstallationState::Pending));
        }
    }

    FilteredPackages { included, excluded, not_included }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
