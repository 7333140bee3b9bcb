// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pk-engine: the assessment and installation orchestrators, the package
//! filter, maintenance-window accounting, the reboot-manager policy layer,
//! and the bounded-truncation status builder.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod assessment;
pub mod filter;
pub mod installer;
pub mod maintenance_window;
pub mod reboot_manager;
pub mod status_truncation;

pub use assessment::{run_assessment, AssessmentSummary};
pub use filter::{effective_classifications, filter_packages, validate_classifications, FilterError, FilteredPackages};
pub use installer::{run_installation, InstallationSummary, InstallerConfig};
pub use maintenance_window::{MaintenanceWindow, MIN_INSTALL_SLOT_MINUTES, REBOOT_RESERVE_MINUTES};
pub use reboot_manager::RebootManager;
pub use status_truncation::{
    truncate_to_budget, ErrorEntry, ErrorLog, TruncationOutcome, AGENT_LIMIT, ERROR_MSG_LIMIT,
    INTERNAL_LIMIT, MAX_ERRORS_RETAINED, MIN_ASSESSMENT_PATCHES_RETAINED,
};
