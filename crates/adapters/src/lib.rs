// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package-manager family adapters and the auto-assessment timer
//! collaborator.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod apt;
mod auto_assessment;
#[cfg(any(test, feature = "test-support"))]
mod fake_package_manager;
mod package_manager;
mod process_runner;
mod rpm_ostree;
mod tdnf;
mod yum;
mod zypper;

pub use apt::AptPackageManager;
pub use auto_assessment::{AutoAssessmentError, AutoAssessmentService, SystemdTimerService};
#[cfg(any(test, feature = "test-support"))]
pub use fake_package_manager::{Call, FakePackageManager};
pub use package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};
pub use rpm_ostree::RpmOstreePackageManager;
pub use tdnf::TdnfPackageManager;
pub use yum::YumPackageManager;
pub use zypper::ZypperPackageManager;

#[cfg(any(test, feature = "test-support"))]
pub use auto_assessment::FakeAutoAssessmentService;
