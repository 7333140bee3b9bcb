// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded-size status serialization: error-list ingestion and the
//! deterministic patch-list truncation schedule that keeps a status
//! document under the agent-facing byte budget.

use pk_core::{ErrorCode, PatchRecord, SubstatusState};

/// Hard agent-facing limit on the on-disk StatusFile.
pub const AGENT_LIMIT: usize = 131_072;
/// Internal reserve the truncation search targets, strictly below
/// [`AGENT_LIMIT`].
pub const INTERNAL_LIMIT: usize = 129_024;
/// Assessment patch records are never shrunk below this count while any
/// installation records remain.
pub const MIN_ASSESSMENT_PATCHES_RETAINED: usize = 5;
/// Per-error message length, in characters.
pub const ERROR_MSG_LIMIT: usize = 128;
/// Errors retained per substatus.
pub const MAX_ERRORS_RETAINED: usize = 5;

/// Diagnostic messages exempt from [`ERROR_MSG_LIMIT`] truncation because
/// their full text is load-bearing for support triage.
const ERROR_MSG_ALLOW_LIST: &[&str] = &["classification plugin data unavailable"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub code: ErrorCode,
    pub message: String,
}

/// Per-operation error collection: coalesces duplicate messages, truncates
/// long ones, and caps total entries at [`MAX_ERRORS_RETAINED`].
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: ErrorCode, message: impl Into<String>) {
        let message = message.into();
        let normalized = message.trim().to_lowercase();
        if self.entries.iter().any(|e| e.message.trim().to_lowercase() == normalized) {
            return;
        }
        if self.entries.len() >= MAX_ERRORS_RETAINED {
            return;
        }
        let message = truncate_message(&message);
        self.entries.push(ErrorEntry { code, message });
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn truncate_message(message: &str) -> String {
    if ERROR_MSG_ALLOW_LIST.iter().any(|allowed| message.contains(allowed)) {
        return message.to_string();
    }
    if message.chars().count() <= ERROR_MSG_LIMIT {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(ERROR_MSG_LIMIT.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

#[derive(Debug, Clone)]
pub struct TruncationOutcome {
    pub installation_patches: Vec<PatchRecord>,
    pub assessment_patches: Vec<PatchRecord>,
    pub truncated: bool,
}

impl TruncationOutcome {
    /// Truncation bumps `success -> warning` only; never downgrades `error`,
    /// never touches `transitioning`.
    pub fn apply_status_bump(&self, current: SubstatusState) -> SubstatusState {
        if self.truncated {
            current.downgraded_by_truncation()
        } else {
            current
        }
    }
}

/// Largest `len` in `[min, total]` for which `fits(len)` holds, assuming
/// `fits` is monotonic: smaller lengths are at least as likely to fit.
fn largest_len_that_fits(total: usize, min: usize, fits: impl Fn(usize) -> bool) -> usize {
    if fits(total) {
        return total;
    }
    if !fits(min) {
        return min;
    }
    let (mut lo, mut hi) = (min, total);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Shrink `installation_patches`/`assessment_patches` until
/// `serialized_size` reports a size within `limit`, appending a tombstone
/// record to any list that was shrunk.
///
/// Installation records have priority: assessment records are shrunk first,
/// down to [`MIN_ASSESSMENT_PATCHES_RETAINED`]; installation records are
/// only shrunk if the budget still isn't met with assessment at its floor.
pub fn truncate_to_budget(
    installation_patches: &[PatchRecord],
    assessment_patches: &[PatchRecord],
    limit: usize,
    mut serialized_size: impl FnMut(&[PatchRecord], &[PatchRecord]) -> usize,
) -> TruncationOutcome {
    let install_total = installation_patches.len();
    let assess_total = assessment_patches.len();

    if serialized_size(installation_patches, assessment_patches) <= limit {
        return TruncationOutcome {
            installation_patches: installation_patches.to_vec(),
            assessment_patches: assessment_patches.to_vec(),
            truncated: false,
        };
    }

    let assess_min = MIN_ASSESSMENT_PATCHES_RETAINED.min(assess_total);
    let assess_len = largest_len_that_fits(assess_total, assess_min, |len| {
        serialized_size(installation_patches, &assessment_patches[..len]) <= limit
    });

    let mut install_len = install_total;
    if serialized_size(installation_patches, &assessment_patches[..assess_len]) > limit {
        install_len = largest_len_that_fits(install_total, 0, |len| {
            serialized_size(&installation_patches[..len], &assessment_patches[..assess_len]) <= limit
        });
    }

    let mut final_installation = installation_patches[..install_len].to_vec();
    if install_len < install_total {
        final_installation.push(PatchRecord::tombstone());
    }

    let mut final_assessment = assessment_patches[..assess_len].to_vec();
    if assess_len < assess_total {
        final_assessment.push(PatchRecord::tombstone());
    }

    TruncationOutcome {
        installation_patches: final_installation,
        assessment_patches: final_assessment,
        truncated: true,
    }
}

#[cfg(test)]
#[path = "status_truncation_tests.rs"]
mod tests;
