// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package record and classification types shared by the orchestrators,
//! the status handler, and the wire schema.

use serde::{Deserialize, Serialize};

/// Version sentinel for packages that require an Extended Security
/// Maintenance (ESM) contract and are not installable without one.
pub const UA_ESM_REQUIRED: &str = "UA_ESM_REQUIRED";

/// Patch classification as requested in configuration or assigned during
/// assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Critical,
    Security,
    Other,
    Unclassified,
    /// APT extended-security-maintenance packages, version pinned to
    /// [`UA_ESM_REQUIRED`].
    #[serde(rename = "Security-ESM")]
    SecurityEsm,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Critical => "Critical",
            Classification::Security => "Security",
            Classification::Other => "Other",
            Classification::Unclassified => "Unclassified",
            Classification::SecurityEsm => "Security-ESM",
        }
    }
}

/// Installation-state machine for a single package within one run.
///
/// Every package in a final InstallationSummary is in exactly one of
/// these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchInstallationState {
    NotSelected,
    Excluded,
    Pending,
    Installed,
    Failed,
}

/// `patchId = "<name>_<version>_<distro>_<distroVersion>"`.
///
/// Kept as an owned `String` rather than a fixed-width inline buffer:
/// package names and distro identifiers have no practical length bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchId(pub String);

impl PatchId {
    pub fn build(name: &str, version: &str, distro_name: &str, distro_version: &str) -> Self {
        Self(format!("{name}_{version}_{distro_name}_{distro_version}"))
    }
}

impl std::fmt::Display for PatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single package entry as it appears in an Assessment or Installation
/// substatus `patches` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRecord {
    pub patch_id: PatchId,
    pub name: String,
    pub version: String,
    pub classifications: Vec<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_installation_state: Option<PatchInstallationState>,
}

impl PatchRecord {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        distro_name: &str,
        distro_version: &str,
        classifications: Vec<Classification>,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let patch_id = PatchId::build(&name, &version, distro_name, distro_version);
        Self { patch_id, name, version, classifications, patch_installation_state: None }
    }

    pub fn with_state(mut self, state: PatchInstallationState) -> Self {
        self.patch_installation_state = Some(state);
        self
    }

    /// Synthetic record appended by the truncator when a package list is
    /// shrunk to fit the status budget.
    pub fn tombstone() -> Self {
        Self {
            patch_id: PatchId("Truncated_patch_list_id".to_string()),
            name: "Truncated_patch_list_...".to_string(),
            version: String::new(),
            classifications: vec![Classification::Other],
            patch_installation_state: Some(PatchInstallationState::NotSelected),
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.patch_id.0 == "Truncated_patch_list_id"
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
