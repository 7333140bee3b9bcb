// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `PackageManager` double for orchestrator unit tests. Scripted
//! like `FakeClock`: a test builds the fake with the responses it wants,
//! then inspects `calls()` for what the orchestrator asked of it.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::package_manager::{
    AutoOsPatchState, InstallOutcome, NamedVersion, PackageManager, PackageManagerError,
    PackageManagerFamily, RepeatRequired,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RefreshRepository,
    GetAllUpdates { cached: bool },
    GetSecurityUpdates,
    GetOtherUpdates,
    GetAllAvailableVersions { name: String },
    IsPackageVersionInstalled { name: String, version: String },
    GetDependents { name: String },
    InstallUpdateAndDependencies { names: Vec<NamedVersion>, simulate: bool },
    GetCurrentAutoOsPatchState,
    DisableAutoOsUpdate,
    IsRebootPending,
}

struct FakeState {
    calls: Vec<Call>,
    all_updates: Vec<NamedVersion>,
    security_updates: Vec<NamedVersion>,
    other_updates: Vec<NamedVersion>,
    available_versions: Vec<String>,
    installed_versions: std::collections::HashSet<(String, String)>,
    dependents: std::collections::HashMap<String, Vec<String>>,
    /// Queued outcomes returned in order by successive
    /// `install_update_and_dependencies` calls; the last entry repeats once
    /// exhausted.
    install_outcomes: VecDeque<(InstallOutcome, RepeatRequired)>,
    auto_os_patch_state: AutoOsPatchState,
    reboot_pending: bool,
    refresh_result: Result<(), String>,
}

#[derive(Clone)]
pub struct FakePackageManager {
    family: PackageManagerFamily,
    inner: Arc<Mutex<FakeState>>,
}

impl FakePackageManager {
    pub fn new(family: PackageManagerFamily) -> Self {
        Self {
            family,
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                all_updates: Vec::new(),
                security_updates: Vec::new(),
                other_updates: Vec::new(),
                available_versions: Vec::new(),
                installed_versions: std::collections::HashSet::new(),
                dependents: std::collections::HashMap::new(),
                install_outcomes: VecDeque::from([(InstallOutcome::Installed, RepeatRequired(false))]),
                auto_os_patch_state: AutoOsPatchState::Unknown,
                reboot_pending: false,
                refresh_result: Ok(()),
            })),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn set_all_updates(&self, updates: Vec<NamedVersion>) {
        self.inner.lock().all_updates = updates;
    }

    pub fn set_security_updates(&self, updates: Vec<NamedVersion>) {
        self.inner.lock().security_updates = updates;
    }

    pub fn set_other_updates(&self, updates: Vec<NamedVersion>) {
        self.inner.lock().other_updates = updates;
    }

    pub fn set_dependents(&self, name: impl Into<String>, dependents: Vec<String>) {
        self.inner.lock().dependents.insert(name.into(), dependents);
    }

    pub fn mark_installed(&self, name: impl Into<String>, version: impl Into<String>) {
        self.inner.lock().installed_versions.insert((name.into(), version.into()));
    }

    pub fn queue_install_outcome(&self, outcome: InstallOutcome, repeat: RepeatRequired) {
        self.inner.lock().install_outcomes.push_back((outcome, repeat));
    }

    pub fn set_reboot_pending(&self, pending: bool) {
        self.inner.lock().reboot_pending = pending;
    }

    pub fn set_refresh_failure(&self, message: impl Into<String>) {
        self.inner.lock().refresh_result = Err(message.into());
    }

    pub fn set_auto_os_patch_state(&self, state: AutoOsPatchState) {
        self.inner.lock().auto_os_patch_state = state;
    }
}

#[async_trait]
impl PackageManager for FakePackageManager {
    fn family(&self) -> PackageManagerFamily {
        self.family
    }

    async fn refresh_repository(&self) -> Result<(), PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::RefreshRepository);
        state.refresh_result.clone().map_err(PackageManagerError::RefreshFailed)
    }

    async fn get_all_updates(&self, cached: bool) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::GetAllUpdates { cached });
        Ok(state.all_updates.clone())
    }

    async fn get_security_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::GetSecurityUpdates);
        Ok(state.security_updates.clone())
    }

    async fn get_other_updates(&self) -> Result<Vec<NamedVersion>, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::GetOtherUpdates);
        Ok(state.other_updates.clone())
    }

    async fn get_all_available_versions(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::GetAllAvailableVersions { name: name.to_string() });
        Ok(state.available_versions.clone())
    }

    async fn is_package_version_installed(
        &self,
        name: &str,
        version: &str,
    ) -> Result<bool, PackageManagerError> {
        let mut state = self.inner.lock();
        state
            .calls
            .push(Call::IsPackageVersionInstalled { name: name.to_string(), version: version.to_string() });
        Ok(state.installed_versions.contains(&(name.to_string(), version.to_string())))
    }

    async fn get_dependents(&self, name: &str) -> Result<Vec<String>, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::GetDependents { name: name.to_string() });
        Ok(state.dependents.get(name).cloned().unwrap_or_default())
    }

    async fn install_update_and_dependencies(
        &self,
        names: &[NamedVersion],
        simulate: bool,
    ) -> Result<(InstallOutcome, RepeatRequired), PackageManagerError> {
        let mut state = self.inner.lock();
        state
            .calls
            .push(Call::InstallUpdateAndDependencies { names: names.to_vec(), simulate });
        let next = if state.install_outcomes.len() > 1 {
            state.install_outcomes.pop_front()
        } else {
            state.install_outcomes.front().cloned()
        };
        Ok(next.unwrap_or((InstallOutcome::Installed, RepeatRequired(false))))
    }

    async fn get_current_auto_os_patch_state(&self) -> Result<AutoOsPatchState, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::GetCurrentAutoOsPatchState);
        Ok(state.auto_os_patch_state)
    }

    async fn disable_auto_os_update(&self) -> Result<(), PackageManagerError> {
        self.inner.lock().calls.push(Call::DisableAutoOsUpdate);
        Ok(())
    }

    async fn is_reboot_pending(&self) -> Result<bool, PackageManagerError> {
        let mut state = self.inner.lock();
        state.calls.push(Call::IsRebootPending);
        Ok(state.reboot_pending)
    }
}

#[cfg(test)]
#[path = "fake_package_manager_tests.rs"]
mod tests;
