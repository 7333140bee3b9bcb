// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk StatusFile schema: a JSON array containing exactly one
//! status object, whose substatus entries carry a double-encoded JSON
//! string payload in `formattedMessage.message`.

use chrono::{DateTime, Utc};
use pk_core::{ErrorCode, Operation, PatchRecord, RebootStatus, StartedBy, SubstatusState};
use serde::{Deserialize, Serialize};

pub const STATUS_NAME: &str = "Azure Patch Management";

/// One element of the on-disk array. Invariant: the file always contains
/// exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusFileEntry {
    pub version: f64,
    #[serde(rename = "timestampUTC")]
    pub timestamp_utc: DateTime<Utc>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
    pub operation: Operation,
    pub status: SubstatusState,
    pub code: u8,
    #[serde(rename = "formattedMessage")]
    pub formatted_message: FormattedMessage,
    pub substatus: Vec<Substatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedMessage {
    pub lang: String,
    pub message: String,
}

impl FormattedMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { lang: "en-US".to_string(), message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstatusName {
    PatchAssessmentSummary,
    PatchInstallationSummary,
    ConfigurePatchingSummary,
    PatchMetadataForHealthStore,
}

/// A substatus entry. `formatted_message.message` holds the serialized
/// (and therefore double-encoded) detail payload — callers build it with
/// [`Substatus::with_payload`] rather than constructing the string by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substatus {
    pub name: SubstatusName,
    pub status: SubstatusState,
    pub code: u8,
    #[serde(rename = "formattedMessage")]
    pub formatted_message: FormattedMessage,
}

impl Substatus {
    pub fn with_payload<T: Serialize>(
        name: SubstatusName,
        status: SubstatusState,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let message = serde_json::to_string(payload)?;
        Ok(Self { name, status, code: status.code(), formatted_message: FormattedMessage::new(message) })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorsSummary {
    pub code: u8,
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    #[serde(rename = "assessmentActivityId")]
    pub assessment_activity_id: String,
    #[serde(rename = "rebootPending")]
    pub reboot_pending: bool,
    #[serde(rename = "criticalAndSecurityPatchCount")]
    pub critical_and_security_patch_count: usize,
    #[serde(rename = "otherPatchCount")]
    pub other_patch_count: usize,
    pub patches: Vec<PatchRecord>,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "lastModifiedTime")]
    pub last_modified_time: DateTime<Utc>,
    #[serde(rename = "startedBy")]
    pub started_by: StartedBy,
    pub errors: ErrorsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationSummary {
    #[serde(rename = "installationActivityId")]
    pub installation_activity_id: String,
    #[serde(rename = "rebootStatus")]
    pub reboot_status: RebootStatus,
    #[serde(rename = "maintenanceWindowExceeded")]
    pub maintenance_window_exceeded: bool,
    #[serde(rename = "notSelectedPatchCount")]
    pub not_selected_patch_count: usize,
    #[serde(rename = "excludedPatchCount")]
    pub excluded_patch_count: usize,
    #[serde(rename = "pendingPatchCount")]
    pub pending_patch_count: usize,
    #[serde(rename = "installedPatchCount")]
    pub installed_patch_count: usize,
    #[serde(rename = "failedPatchCount")]
    pub failed_patch_count: usize,
    pub patches: Vec<PatchRecord>,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "lastModifiedTime")]
    pub last_modified_time: DateTime<Utc>,
    #[serde(rename = "maintenanceRunId", skip_serializing_if = "Option::is_none")]
    pub maintenance_run_id: Option<String>,
    pub errors: ErrorsSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomaticOsPatchState {
    Unknown,
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoAssessmentState {
    Unknown,
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoAssessmentStatus {
    #[serde(rename = "autoAssessmentState")]
    pub auto_assessment_state: AutoAssessmentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurePatchingSummary {
    #[serde(rename = "automaticOSPatchState")]
    pub automatic_os_patch_state: AutomaticOsPatchState,
    #[serde(rename = "autoAssessmentStatus")]
    pub auto_assessment_status: AutoAssessmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMetadataForHealthStore {
    #[serde(rename = "patchVersion")]
    pub patch_version: String,
    #[serde(rename = "shouldReportToHealthStore")]
    pub should_report_to_health_store: bool,
}

impl StatusFileEntry {
    pub fn byte_len(&self) -> Result<usize, serde_json::Error> {
        Ok(serde_json::to_vec(&vec![self.clone()])?.len())
    }
}

#[cfg(test)]
#[path = "status_file_tests.rs"]
mod tests;
