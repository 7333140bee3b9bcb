// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-pass assessment: enumerate available updates, classify them, and
//! build the `PatchAssessmentSummary` substatus payload.

use chrono::{DateTime, Utc};
use pk_adapters::PackageManager;
use pk_core::{Classification, ErrorCode, PatchRecord, StartedBy, SubstatusState, UA_ESM_REQUIRED};

use crate::status_truncation::ErrorLog;

pub struct AssessmentSummary {
    pub assessment_activity_id: String,
    pub reboot_pending: bool,
    pub patches: Vec<PatchRecord>,
    pub start_time: DateTime<Utc>,
    pub last_modified_time: DateTime<Utc>,
    pub started_by: StartedBy,
    pub errors: Vec<crate::status_truncation::ErrorEntry>,
    pub status: SubstatusState,
}

impl AssessmentSummary {
    pub fn critical_and_security_patch_count(&self) -> usize {
        self.patches
            .iter()
            .filter(|p| {
                p.classifications.iter().any(|c| {
                    matches!(c, Classification::Critical | Classification::Security | Classification::SecurityEsm)
                })
            })
            .count()
    }

    pub fn other_patch_count(&self) -> usize {
        self.patches.len() - self.critical_and_security_patch_count()
    }
}

/// Packages whose extended-security-maintenance classification requires an
/// active UA/ESM contract; the adapter reports these with a distinguished
/// version sentinel rather than a real version string.
fn is_esm_package(nv: &pk_adapters::NamedVersion) -> bool {
    nv.version == UA_ESM_REQUIRED
}

#[allow(clippy::too_many_arguments)]
pub async fn run_assessment(
    package_manager: &dyn PackageManager,
    activity_id: impl Into<String>,
    distro_name: &str,
    distro_version: &str,
    start_time: DateTime<Utc>,
    now: DateTime<Utc>,
    started_by: StartedBy,
) -> AssessmentSummary {
    let activity_id = activity_id.into();
    let mut errors = ErrorLog::new();
    let mut status = SubstatusState::Success;

    if let Err(err) = package_manager.refresh_repository().await {
        errors.push(ErrorCode::PackageManagerFailure, err.to_string());
        status = SubstatusState::Warning;
    }

    let all = match package_manager.get_all_updates(false).await {
        Ok(all) => all,
        Err(err) => {
            errors.push(ErrorCode::PackageManagerFailure, err.to_string());
            return AssessmentSummary {
                assessment_activity_id: activity_id,
                reboot_pending: false,
                patches: Vec::new(),
                start_time,
                last_modified_time: now,
                started_by,
                errors: errors.entries().to_vec(),
                status: SubstatusState::Error,
            };
        }
    };

    // A family lacking classification plugin data (CentOS YUM) reports an
    // empty security subset rather than an error; everything is then
    // classified `Other` below, with a non-fatal diagnostic.
    let security = match package_manager.get_security_updates().await {
        Ok(security) => security,
        Err(err) => {
            errors.push(ErrorCode::DefaultError, "classification plugin data unavailable");
            errors.push(ErrorCode::PackageManagerFailure, err.to_string());
            status = status.downgraded_by_truncation();
            Vec::new()
        }
    };

    let mut patches = Vec::with_capacity(all.len());
    for nv in &all {
        let is_security = security.iter().any(|s| s.name == nv.name);
        let classifications = if is_esm_package(nv) {
            vec![Classification::SecurityEsm]
        } else if is_security {
            vec![Classification::Critical, Classification::Security]
        } else {
            vec![Classification::Other]
        };
        patches.push(PatchRecord::new(&nv.name, &nv.version, distro_name, distro_version, classifications));
    }

    let reboot_pending = package_manager.is_reboot_pending().await.unwrap_or_else(|err| {
        errors.push(ErrorCode::PackageManagerFailure, err.to_string());
        false
    });

    AssessmentSummary {
        assessment_activity_id: activity_id,
        reboot_pending,
        patches,
        start_time,
        last_modified_time: now,
        started_by,
        errors: errors.entries().to_vec(),
        status,
    }
}

#[cfg(test)]
#[path = "assessment_tests.rs"]
mod tests;
