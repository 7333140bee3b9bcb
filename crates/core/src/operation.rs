// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level operation and policy enums parsed from the sequenced settings
//! document and carried through status reporting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Assessment,
    Installation,
    ConfigurePatching,
    NoOperation,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Assessment => "Assessment",
            Operation::Installation => "Installation",
            Operation::ConfigurePatching => "ConfigurePatching",
            Operation::NoOperation => "NoOperation",
        }
    }

    /// Whether this operation spawns a core process.
    pub fn spawns_core(&self) -> bool {
        matches!(self, Operation::Assessment | Operation::Installation | Operation::ConfigurePatching)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebootSetting {
    Never,
    IfRequired,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchModeSetting {
    ImageDefault,
    AutomaticByPlatform,
}

/// Status-level and substatus-level outcome as reported in the StatusFile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstatusState {
    Success,
    Error,
    Transitioning,
    Warning,
}

impl SubstatusState {
    /// Numeric `errors.code` carried alongside the state.
    pub fn code(&self) -> u8 {
        match self {
            SubstatusState::Success => 0,
            SubstatusState::Error => 1,
            SubstatusState::Warning => 2,
            SubstatusState::Transitioning => 0,
        }
    }

    /// Truncation bumps `success -> warning` only; it never downgrades an
    /// existing `error` and never touches `transitioning`.
    pub fn downgraded_by_truncation(self) -> Self {
        match self {
            SubstatusState::Success => SubstatusState::Warning,
            other => other,
        }
    }
}

/// Who triggered an assessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartedBy {
    User,
    Platform,
}

/// Reboot manager state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebootStatus {
    NotNeeded,
    Required,
    Started,
    Completed,
    Failed,
}

impl RebootStatus {
    /// Whether `self -> next` is an allowed transition. Disallowed
    /// transitions are rejected by the caller (logged, no state change).
    ///
    /// Only `NotNeeded`/`Completed`/`Required` may become
    /// `Started`, and the post-reboot instance promotes `Started ->
    /// Completed`. A re-write of the current state is always a no-op.
    /// `Completed`/`Failed` may settle back to `NotNeeded`/`Required` at the
    /// start of a fresh run once reboot-pending is re-evaluated; `Required`
    /// may only resolve forward to `Started`, never silently back to
    /// `NotNeeded`.
    pub fn can_transition_to(self, next: RebootStatus) -> bool {
        use RebootStatus::*;
        if self == next {
            return true;
        }
        match (self, next) {
            (NotNeeded, Required) => true,
            (NotNeeded, Started) => true,
            (Required, Started) => true,
            (Completed, Started) => true,
            (Completed, Required) => true,
            (Completed, NotNeeded) => true,
            (Started, Completed) => true,
            (Started, Failed) => true,
            (Failed, Required) => true,
            (Failed, NotNeeded) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
