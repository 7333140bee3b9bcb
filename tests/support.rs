//! Shared fixtures for the root-level integration specs: a tempdir-backed
//! extension installation plus fixture builders for the state documents the
//! handler and core process read and write.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{DateTime, Utc};
use pk_core::{Classification, Operation, PatchModeSetting, RebootSetting};
use pk_wire::{CoreState, ExtState, StatusFileEntry};
use serde_json::json;
use tempfile::TempDir;

/// A fake extension installation: a tempdir laid out the way the host agent
/// lays one out, with `HandlerEnvironment.json` pointing at sibling
/// `config`/`status`/`log`/`events` directories.
pub struct Extension {
    root: TempDir,
}

impl Extension {
    /// A fresh installation with no `install` run yet — just the
    /// `HandlerEnvironment.json` the host agent drops before ever invoking
    /// the handler.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let env = json!([{
            "handlerEnvironment": {
                "configFolder": root.path().join("config").display().to_string(),
                "statusFolder": root.path().join("status").display().to_string(),
                "logFolder": root.path().join("log").display().to_string(),
                "eventsFolder": root.path().join("events").display().to_string(),
            }
        }]);
        std::fs::write(root.path().join("HandlerEnvironment.json"), env.to_string())
            .expect("write HandlerEnvironment.json");
        Self { root }
    }

    /// A fresh installation with `install` already run, so `config/`,
    /// `status/`, `log/`, and `events/` all exist.
    pub fn installed() -> Self {
        let ext = Self::new();
        ext.patchext().arg("install").assert().success();
        ext
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root().join("config")
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root().join("status")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root().join("log")
    }

    pub fn events_dir(&self) -> PathBuf {
        self.root().join("events")
    }

    /// An `assert_cmd::Command` for the `patchext` binary, already pointed
    /// at this installation's `HandlerEnvironment.json` and run with this
    /// installation's root as the working directory (the same way the host
    /// agent invokes the real extension).
    pub fn patchext(&self) -> Command {
        let mut cmd = Command::cargo_bin("patchext").expect("patchext binary");
        cmd.current_dir(self.root());
        cmd.arg("--handler-env").arg(self.root().join("HandlerEnvironment.json"));
        cmd
    }

    pub fn write_settings(&self, sequence_number: u64, operation: Operation) {
        self.write_settings_doc(sequence_number, &minimal_settings(operation));
    }

    pub fn write_settings_doc(&self, sequence_number: u64, doc: &serde_json::Value) {
        std::fs::create_dir_all(self.config_dir()).expect("config dir");
        std::fs::write(
            self.config_dir().join(format!("{sequence_number}.settings")),
            doc.to_string(),
        )
        .expect("write settings");
    }

    pub fn write_ext_state(&self, ext_state: &ExtState) {
        std::fs::create_dir_all(self.config_dir()).expect("config dir");
        let path = self.config_dir().join("ExtState.json");
        std::fs::write(path, serde_json::to_string_pretty(ext_state).expect("serialize ExtState")).expect("write ExtState.json");
    }

    pub fn write_core_state(&self, core_state: &CoreState) {
        std::fs::create_dir_all(self.config_dir()).expect("config dir");
        let path = self.config_dir().join("CoreState.json");
        std::fs::write(path, serde_json::to_string_pretty(core_state).expect("serialize CoreState")).expect("write CoreState.json");
    }

    pub fn status_path(&self, sequence_number: u64) -> PathBuf {
        self.status_dir().join(format!("{sequence_number}.status"))
    }

    pub fn read_status(&self, sequence_number: u64) -> StatusFileEntry {
        let bytes = std::fs::read(self.status_path(sequence_number)).expect("read status file");
        let mut entries: Vec<StatusFileEntry> = serde_json::from_slice(&bytes).expect("parse status file");
        assert_eq!(entries.len(), 1, "StatusFile must hold exactly one entry");
        entries.remove(0)
    }
}

/// A minimal settings document naming `operation`, with an empty
/// maintenance window's worth of classification/mask fields and the reboot
/// setting fixed at `IfRequired`.
pub fn minimal_settings(operation: Operation) -> serde_json::Value {
    json!({
        "operation": operation,
        "activityId": "11111111-1111-1111-1111-111111111111",
        "startTime": Utc::now(),
        "maintenanceWindow": 90,
        "classificationsToIncludeInPatchOperation": Vec::<Classification>::new(),
        "patchesToIncludeInInstallation": Vec::<String>::new(),
        "patchesToExcludeFromInstallation": Vec::<String>::new(),
        "rebootSetting": RebootSetting::IfRequired,
        "patchMode": PatchModeSetting::ImageDefault,
        "assessmentMode": PatchModeSetting::ImageDefault,
        "acceptPackageEula": false,
        "execAutoAssessOnly": false,
    })
}

pub fn ext_state(sequence_number: u64, achieve_enable_by: DateTime<Utc>, operation: Operation) -> ExtState {
    ExtState::new(sequence_number, achieve_enable_by, operation)
}

pub fn live_core_state(sequence_number: u64, operation: Operation, now: DateTime<Utc>) -> CoreState {
    CoreState::started(sequence_number, operation, now, std::process::id())
}
