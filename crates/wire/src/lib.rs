// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk JSON schemas shared between the handler and the core: ExtState,
//! CoreState, and the StatusFile the host agent consumes.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod core_state;
mod ext_state;
mod status_file;

pub use core_state::CoreState;
pub use ext_state::{ExtState, ExtensionSequence};
pub use status_file::{
    AssessmentSummary, AutoAssessmentState, AutoAssessmentStatus, AutomaticOsPatchState,
    ConfigurePatchingSummary, ErrorDetail, ErrorsSummary, FormattedMessage, InstallationSummary,
    PatchMetadataForHealthStore, Status, StatusFileEntry, Substatus, SubstatusName, STATUS_NAME,
};
