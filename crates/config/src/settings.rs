// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sequenced settings document (`<N>.settings`) the host agent drops in
//! `config/` for each invocation.

use chrono::{DateTime, Utc};
use pk_core::{Classification, Operation, PatchModeSetting, RebootSetting};
use serde::{Deserialize, Serialize};

/// One runtime setting, as delivered by the host agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    pub operation: Operation,
    #[serde(rename = "activityId")]
    pub activity_id: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "maintenanceRunId", skip_serializing_if = "Option::is_none", default)]
    pub maintenance_run_id: Option<String>,
    #[serde(rename = "healthStoreId", skip_serializing_if = "Option::is_none", default)]
    pub health_store_id: Option<String>,
    #[serde(rename = "maintenanceWindow")]
    pub maintenance_window_minutes: u32,
    #[serde(rename = "classificationsToIncludeInPatchOperation", default)]
    pub classifications_to_include: Vec<Classification>,
    #[serde(rename = "patchesToIncludeInInstallation", default)]
    pub patches_to_include: Vec<String>,
    #[serde(rename = "patchesToExcludeFromInstallation", default)]
    pub patches_to_exclude: Vec<String>,
    #[serde(rename = "rebootSetting")]
    pub reboot_setting: RebootSetting,
    #[serde(rename = "patchMode")]
    pub patch_mode: PatchModeSetting,
    #[serde(rename = "assessmentMode")]
    pub assessment_mode: PatchModeSetting,
    #[serde(rename = "acceptPackageEula", default)]
    pub accept_package_eula: bool,
    /// Distinguishes a platform-triggered auto-assessment run from a
    /// user-triggered one; drives `AssessmentSummary.startedBy`.
    #[serde(rename = "execAutoAssessOnly", default)]
    pub exec_auto_assess_only: bool,
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
