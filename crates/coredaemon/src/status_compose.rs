// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status composition: convert the engine's in-memory summaries into the
//! on-disk StatusFile schema, apply the bounded-truncation schedule, and
//! write both the complete and agent-facing files.
//!
//! The complete file (unbounded) is written first, for diagnostics; the
//! truncated file is what the host agent actually reads.

use std::path::Path;

use chrono::Utc;
use pk_core::{ErrorCode, Operation, PatchRecord, SubstatusState};
use pk_engine::{truncate_to_budget, AGENT_LIMIT, INTERNAL_LIMIT};
use pk_storage::{write_json_with_retry, RetryPolicy, StoreError};
use pk_wire::{
    AssessmentSummary as WireAssessmentSummary, ConfigurePatchingSummary, ErrorDetail, ErrorsSummary,
    FormattedMessage, InstallationSummary as WireInstallationSummary, Status, StatusFileEntry,
    Substatus, SubstatusName, STATUS_NAME,
};

use crate::configure_patching::ConfigurePatchingOutcome;

fn errors_summary(status: SubstatusState, errors: &[pk_engine::ErrorEntry]) -> ErrorsSummary {
    ErrorsSummary {
        code: status.code(),
        details: errors.iter().map(|e| ErrorDetail { code: e.code, message: e.message.clone() }).collect(),
    }
}

fn bump_if_tombstoned(status: SubstatusState, patches: &[PatchRecord]) -> SubstatusState {
    if patches.iter().any(PatchRecord::is_tombstone) {
        status.downgraded_by_truncation()
    } else {
        status
    }
}

fn push_truncation_error(errors: &mut ErrorsSummary) {
    if errors.details.len() >= pk_engine::MAX_ERRORS_RETAINED {
        return;
    }
    errors.details.push(ErrorDetail {
        code: ErrorCode::TruncationApplied,
        message: "package lists were truncated to fit the status size budget".to_string(),
    });
}

fn wire_assessment(summary: &pk_engine::AssessmentSummary, patches: Vec<PatchRecord>, status: SubstatusState) -> WireAssessmentSummary {
    WireAssessmentSummary {
        assessment_activity_id: summary.assessment_activity_id.clone(),
        reboot_pending: summary.reboot_pending,
        critical_and_security_patch_count: summary.critical_and_security_patch_count(),
        other_patch_count: summary.other_patch_count(),
        patches,
        start_time: summary.start_time,
        last_modified_time: summary.last_modified_time,
        started_by: summary.started_by,
        errors: errors_summary(status, &summary.errors),
    }
}

fn wire_installation(summary: &pk_engine::InstallationSummary, patches: Vec<PatchRecord>, status: SubstatusState) -> WireInstallationSummary {
    use pk_core::PatchInstallationState::*;
    WireInstallationSummary {
        installation_activity_id: summary.installation_activity_id.clone(),
        reboot_status: summary.reboot_status,
        maintenance_window_exceeded: summary.maintenance_window_exceeded,
        not_selected_patch_count: summary.count(NotSelected),
        excluded_patch_count: summary.count(Excluded),
        pending_patch_count: summary.count(Pending),
        installed_patch_count: summary.count(Installed),
        failed_patch_count: summary.count(Failed),
        patches,
        start_time: summary.start_time,
        last_modified_time: summary.last_modified_time,
        maintenance_run_id: summary.maintenance_run_id.clone(),
        errors: errors_summary(status, &summary.errors),
    }
}

fn substatus_state_for(errors: &[pk_engine::ErrorEntry], overall_success: Option<bool>) -> SubstatusState {
    match overall_success {
        Some(false) => SubstatusState::Error,
        _ if !errors.is_empty() => SubstatusState::Warning,
        _ => SubstatusState::Success,
    }
}

/// Compose and write both the complete and truncated StatusFile for one
/// core run. `assessment`/`installation` are whichever summaries this
/// operation actually produced (an `Assessment` run has no installation
/// summary and vice versa). `configure_patching` is only set for a
/// `ConfigurePatching` run, alongside the assessment it always runs first.
#[allow(clippy::too_many_arguments)]
pub fn compose_and_write(
    status_dir: &Path,
    sequence_number: u64,
    operation: Operation,
    assessment: Option<&pk_engine::AssessmentSummary>,
    installation: Option<&pk_engine::InstallationSummary>,
    configure_patching: Option<&ConfigurePatchingOutcome>,
) -> Result<(), StoreError> {
    let now = Utc::now();

    let assessment_status = assessment.map(|a| substatus_state_for(&a.errors, None)).unwrap_or(SubstatusState::Success);
    let installation_status = installation
        .map(|i| substatus_state_for(&i.errors, Some(i.overall_success)))
        .unwrap_or(SubstatusState::Success);
    let configure_patching_status = configure_patching
        .map(|c| if c.failed { SubstatusState::Error } else { SubstatusState::Success })
        .unwrap_or(SubstatusState::Success);

    let assessment_patches: Vec<PatchRecord> = assessment.map(|a| a.patches.clone()).unwrap_or_default();
    let installation_patches: Vec<PatchRecord> = installation.map(|i| i.patches.clone()).unwrap_or_default();

    let complete_entry = build_entry(
        operation,
        assessment,
        installation,
        configure_patching,
        assessment_patches.clone(),
        installation_patches.clone(),
        assessment_status,
        installation_status,
        configure_patching_status,
        now,
    )?;

    write_complete(status_dir, sequence_number, &complete_entry)?;

    if complete_entry.byte_len()? <= AGENT_LIMIT {
        return write_agent_facing(status_dir, sequence_number, &complete_entry);
    }

    // Target the internal reserve, not the hard agent-facing limit, so the
    // truncated output carries headroom against further growth (extra
    // error entries, the truncation notice itself).
    let outcome = truncate_to_budget(&installation_patches, &assessment_patches, INTERNAL_LIMIT, |install, assess| {
        build_entry(
            operation,
            assessment,
            installation,
            configure_patching,
            assess.to_vec(),
            install.to_vec(),
            assessment_status,
            installation_status,
            configure_patching_status,
            now,
        )
        .and_then(|e| e.byte_len())
        .unwrap_or(usize::MAX)
    });

    // Bump each substatus independently: the truncator may have shrunk only
    // one of the two lists, and a substatus whose own list carries no
    // tombstone must not be flagged `warning` with nothing to show for it.
    let bumped_assessment_status = bump_if_tombstoned(assessment_status, &outcome.assessment_patches);
    let bumped_installation_status = bump_if_tombstoned(installation_status, &outcome.installation_patches);

    let truncated_entry = build_entry(
        operation,
        assessment,
        installation,
        configure_patching,
        outcome.assessment_patches,
        outcome.installation_patches,
        bumped_assessment_status,
        bumped_installation_status,
        configure_patching_status,
        now,
    )?;
    write_agent_facing(status_dir, sequence_number, &truncated_entry)
}

#[allow(clippy::too_many_arguments)]
fn build_entry(
    operation: Operation,
    assessment: Option<&pk_engine::AssessmentSummary>,
    installation: Option<&pk_engine::InstallationSummary>,
    configure_patching: Option<&ConfigurePatchingOutcome>,
    assessment_patches: Vec<PatchRecord>,
    installation_patches: Vec<PatchRecord>,
    assessment_status: SubstatusState,
    installation_status: SubstatusState,
    configure_patching_status: SubstatusState,
    now: chrono::DateTime<Utc>,
) -> Result<StatusFileEntry, StoreError> {
    let mut substatus = Vec::new();

    if let Some(a) = assessment {
        let mut wire = wire_assessment(a, assessment_patches, assessment_status);
        if assessment_status == SubstatusState::Warning && wire.patches.iter().any(PatchRecord::is_tombstone) {
            push_truncation_error(&mut wire.errors);
        }
        substatus.push(
            Substatus::with_payload(SubstatusName::PatchAssessmentSummary, assessment_status, &wire)
                .map_err(|source| StoreError::Serialize { path: "<assessment substatus>".to_string(), source })?,
        );
    }

    if let Some(i) = installation {
        let mut wire = wire_installation(i, installation_patches, installation_status);
        if installation_status == SubstatusState::Warning && wire.patches.iter().any(PatchRecord::is_tombstone) {
            push_truncation_error(&mut wire.errors);
        }
        substatus.push(
            Substatus::with_payload(SubstatusName::PatchInstallationSummary, installation_status, &wire)
                .map_err(|source| StoreError::Serialize { path: "<installation substatus>".to_string(), source })?,
        );
    }

    if let Some(c) = configure_patching {
        let wire: &ConfigurePatchingSummary = &c.summary;
        substatus.push(
            Substatus::with_payload(SubstatusName::ConfigurePatchingSummary, configure_patching_status, wire)
                .map_err(|source| StoreError::Serialize { path: "<configure patching substatus>".to_string(), source })?,
        );
    }

    let top_level_status = if substatus.iter().any(|s| s.status == SubstatusState::Error) {
        SubstatusState::Error
    } else if substatus.iter().any(|s| s.status == SubstatusState::Warning) {
        SubstatusState::Warning
    } else {
        SubstatusState::Success
    };

    Ok(StatusFileEntry {
        version: 1.0,
        timestamp_utc: now,
        status: Status {
            name: STATUS_NAME.to_string(),
            operation,
            status: top_level_status,
            code: top_level_status.code(),
            formatted_message: FormattedMessage::new(""),
            substatus,
        },
    })
}

fn write_complete(status_dir: &Path, sequence_number: u64, entry: &StatusFileEntry) -> Result<(), StoreError> {
    let path = status_dir.join(format!("{sequence_number}.complete.status"));
    write_json_with_retry(&path, &vec![entry.clone()], RetryPolicy::default())
}

fn write_agent_facing(status_dir: &Path, sequence_number: u64, entry: &StatusFileEntry) -> Result<(), StoreError> {
    let path = status_dir.join(format!("{sequence_number}.status"));
    write_json_with_retry(&path, &vec![entry.clone()], RetryPolicy::default())
}

#[cfg(test)]
#[path = "status_compose_tests.rs"]
mod tests;
