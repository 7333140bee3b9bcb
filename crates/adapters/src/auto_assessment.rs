// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interface for installing and querying the system-level periodic trigger
//! that re-invokes the extension in auto-assessment mode.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoAssessmentError {
    #[error("failed to write unit file {path}: {source}")]
    WriteUnit { path: String, #[source] source: std::io::Error },
    #[error("systemctl {action} failed: {detail}")]
    Systemctl { action: &'static str, detail: String },
}

#[async_trait]
pub trait AutoAssessmentService: Send + Sync + 'static {
    /// Install the timer+service unit pair at the given cadence and enable
    /// it. Idempotent: re-installing with a new cadence replaces the unit.
    async fn install(&self, cadence: Duration) -> Result<(), AutoAssessmentError>;

    async fn enable(&self) -> Result<(), AutoAssessmentError>;

    async fn disable(&self) -> Result<(), AutoAssessmentError>;

    async fn is_enabled(&self) -> Result<bool, AutoAssessmentError>;

    async fn is_active(&self) -> Result<bool, AutoAssessmentError>;
}

const TIMER_UNIT_NAME: &str = "patchext-auto-assessment.timer";
const SERVICE_UNIT_NAME: &str = "patchext-auto-assessment.service";

/// Real collaborator: writes systemd unit files under `unit_dir` and drives
/// them with `systemctl`.
pub struct SystemdTimerService {
    unit_dir: std::path::PathBuf,
}

impl SystemdTimerService {
    pub fn new(unit_dir: impl Into<std::path::PathBuf>) -> Self {
        Self { unit_dir: unit_dir.into() }
    }

    fn timer_unit_path(&self) -> std::path::PathBuf {
        self.unit_dir.join(TIMER_UNIT_NAME)
    }

    fn service_unit_path(&self) -> std::path::PathBuf {
        self.unit_dir.join(SERVICE_UNIT_NAME)
    }

    fn render_timer_unit(cadence: Duration) -> String {
        format!(
            "[Unit]\nDescription=Patch extension auto-assessment timer\n\n[Timer]\nOnBootSec={secs}s\nOnUnitActiveSec={secs}s\n\n[Install]\nWantedBy=timers.target\n",
            secs = cadence.as_secs()
        )
    }

    fn render_service_unit() -> String {
        "[Unit]\nDescription=Patch extension auto-assessment run\n\n[Service]\nType=oneshot\nExecStart=/usr/lib/patchext/patchext -install\n".to_string()
    }

    async fn run_systemctl(args: &[&str]) -> Result<crate::process_runner::CommandOutput, AutoAssessmentError> {
        crate::process_runner::run_capture("systemctl", args)
            .await
            .map_err(|e| AutoAssessmentError::Systemctl { action: "invoke", detail: e.to_string() })
    }
}

#[async_trait]
impl AutoAssessmentService for SystemdTimerService {
    async fn install(&self, cadence: Duration) -> Result<(), AutoAssessmentError> {
        std::fs::write(self.timer_unit_path(), Self::render_timer_unit(cadence))
            .map_err(|source| AutoAssessmentError::WriteUnit {
                path: self.timer_unit_path().display().to_string(),
                source,
            })?;
        std::fs::write(self.service_unit_path(), Self::render_service_unit())
            .map_err(|source| AutoAssessmentError::WriteUnit {
                path: self.service_unit_path().display().to_string(),
                source,
            })?;
        let output = Self::run_systemctl(&["daemon-reload"]).await?;
        if output.status_code != Some(0) {
            return Err(AutoAssessmentError::Systemctl { action: "daemon-reload", detail: output.combined() });
        }
        self.enable().await
    }

    async fn enable(&self) -> Result<(), AutoAssessmentError> {
        let output = Self::run_systemctl(&["enable", "--now", TIMER_UNIT_NAME]).await?;
        if output.status_code != Some(0) {
            return Err(AutoAssessmentError::Systemctl { action: "enable", detail: output.combined() });
        }
        Ok(())
    }

    async fn disable(&self) -> Result<(), AutoAssessmentError> {
        let output = Self::run_systemctl(&["disable", "--now", TIMER_UNIT_NAME]).await?;
        if output.status_code != Some(0) {
            return Err(AutoAssessmentError::Systemctl { action: "disable", detail: output.combined() });
        }
        Ok(())
    }

    async fn is_enabled(&self) -> Result<bool, AutoAssessmentError> {
        let output = Self::run_systemctl(&["is-enabled", TIMER_UNIT_NAME]).await?;
        Ok(output.stdout.trim() == "enabled")
    }

    async fn is_active(&self) -> Result<bool, AutoAssessmentError> {
        let output = Self::run_systemctl(&["is-active", TIMER_UNIT_NAME]).await?;
        Ok(output.stdout.trim() == "active")
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{AutoAssessmentError, AutoAssessmentService};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    struct FakeState {
        installed_cadence: Option<Duration>,
        enabled: bool,
        active: bool,
    }

    /// In-memory double for unit tests, grounded in the construct-with-
    /// shared-state / record-calls fake-adapter pattern used elsewhere in
    /// this codebase.
    #[derive(Clone)]
    pub struct FakeAutoAssessmentService {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeAutoAssessmentService {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeState { installed_cadence: None, enabled: false, active: false })) }
        }
    }

    impl FakeAutoAssessmentService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn installed_cadence(&self) -> Option<Duration> {
            self.inner.lock().installed_cadence
        }

        pub fn set_active(&self, active: bool) {
            self.inner.lock().active = active;
        }
    }

    #[async_trait]
    impl AutoAssessmentService for FakeAutoAssessmentService {
        async fn install(&self, cadence: Duration) -> Result<(), AutoAssessmentError> {
            let mut state = self.inner.lock();
            state.installed_cadence = Some(cadence);
            state.enabled = true;
            Ok(())
        }

        async fn enable(&self) -> Result<(), AutoAssessmentError> {
            self.inner.lock().enabled = true;
            Ok(())
        }

        async fn disable(&self) -> Result<(), AutoAssessmentError> {
            self.inner.lock().enabled = false;
            Ok(())
        }

        async fn is_enabled(&self) -> Result<bool, AutoAssessmentError> {
            Ok(self.inner.lock().enabled)
        }

        async fn is_active(&self) -> Result<bool, AutoAssessmentError> {
            Ok(self.inner.lock().active)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAutoAssessmentService;

#[cfg(test)]
#[path = "auto_assessment_tests.rs"]
mod tests;
