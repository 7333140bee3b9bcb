// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remaining-time accounting for the installation run's maintenance window.

use chrono::{DateTime, Utc};

/// Safety reserve subtracted from the configured window for a post-loop
/// reboot, when a reboot is allowed.
pub const REBOOT_RESERVE_MINUTES: i64 = 15;

/// Minimum remaining minutes required to start installing one more package.
pub const MIN_INSTALL_SLOT_MINUTES: i64 = 1;

#[derive(Debug, Clone, Copy)]
pub struct MaintenanceWindow {
    total_minutes: i64,
    start_time: DateTime<Utc>,
    reboot_allowed: bool,
}

impl MaintenanceWindow {
    pub fn new(total_minutes: u32, start_time: DateTime<Utc>, reboot_allowed: bool) -> Self {
        Self { total_minutes: i64::from(total_minutes), start_time, reboot_allowed }
    }

    /// Minutes left in the window as of `now`, net of the reboot reserve
    /// when a reboot is allowed. Never negative.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.start_time).num_minutes();
        let reserve = if self.reboot_allowed { REBOOT_RESERVE_MINUTES } else { 0 };
        (self.total_minutes - elapsed - reserve).max(0)
    }

    pub fn is_package_install_time_available(&self, now: DateTime<Utc>) -> bool {
        self.remaining_minutes(now) >= MIN_INSTALL_SLOT_MINUTES
    }

    /// Fraction of the total window consumed as of `now`, as reported in
    /// telemetry. `0.0` when the window has zero total minutes.
    pub fn percentage_used(&self, now: DateTime<Utc>) -> f64 {
        if self.total_minutes <= 0 {
            return 0.0;
        }
        let elapsed = (now - self.start_time).num_minutes();
        ((elapsed as f64 / self.total_minutes as f64) * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
#[path = "maintenance_window_tests.rs"]
mod tests;
