// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequence-number discovery and settings-document loading.
//!
//! The sequence number `N` names the `<N>.settings` file the host agent
//! wants this invocation to act on. It is read from an environment variable
//! when present; otherwise the newest `*.settings` file by modification time
//! is used.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::RuntimeSettings;

pub const SEQUENCE_NUMBER_ENV_VAR: &str = "ConfigSequenceNumber";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no *.settings file found in {0}")]
    NoSettingsFile(String),
    #[error("cannot list {path}: {source}")]
    ListDir { path: String, #[source] source: std::io::Error },
    #[error("{0} does not name a valid sequence number and no *.settings fallback matched")]
    InvalidEnvValue(String),
    #[error("cannot read {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },
    #[error("malformed settings document at {path}: {source}")]
    Parse { path: String, #[source] source: serde_json::Error },
}

/// Discover the sequence number for this invocation: the environment
/// variable is preferred; if unset, the newest `*.settings` file in
/// `config_dir` (by modification time) is used.
pub fn discover_sequence_number(config_dir: &Path) -> Result<u64, DiscoveryError> {
    if let Ok(raw) = std::env::var(SEQUENCE_NUMBER_ENV_VAR) {
        return raw
            .trim()
            .parse()
            .map_err(|_| DiscoveryError::InvalidEnvValue(raw));
    }
    newest_settings_sequence_number(config_dir)
}

fn newest_settings_sequence_number(config_dir: &Path) -> Result<u64, DiscoveryError> {
    let path = newest_settings_file(config_dir)?
        .ok_or_else(|| DiscoveryError::NoSettingsFile(config_dir.display().to_string()))?;
    sequence_number_from_path(&path)
        .ok_or_else(|| DiscoveryError::NoSettingsFile(config_dir.display().to_string()))
}

fn newest_settings_file(config_dir: &Path) -> Result<Option<PathBuf>, DiscoveryError> {
    let entries = std::fs::read_dir(config_dir)
        .map_err(|source| DiscoveryError::ListDir { path: config_dir.display().to_string(), source })?;

    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("settings") {
            continue;
        }
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(_) => continue,
        };
        if newest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

fn sequence_number_from_path(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Path of the `<N>.settings` file for sequence number `N` in `config_dir`.
pub fn settings_path(config_dir: &Path, sequence_number: u64) -> PathBuf {
    config_dir.join(format!("{sequence_number}.settings"))
}

/// Load and parse the settings document for `sequence_number` from
/// `config_dir`.
pub fn load_settings(
    config_dir: &Path,
    sequence_number: u64,
) -> Result<RuntimeSettings, DiscoveryError> {
    let path = settings_path(config_dir, sequence_number);
    let path_str = path.display().to_string();
    let bytes = std::fs::read(&path)
        .map_err(|source| DiscoveryError::Read { path: path_str.clone(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| DiscoveryError::Parse { path: path_str, source })
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
