// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `update`: the host agent replaces the extension in place, side by side
//! with the old version directory for one invocation. Carries forward
//! ExtState, CoreState, and any `.bak` artifacts so in-flight state isn't
//! lost across the version bump.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::exit_error::{handler_failed, ExitError};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("extension root {0} has no parent directory")]
    NoParentDir(String),
    #[error("cannot list sibling version directories of {0}: {1}")]
    ListDir(String, std::io::Error),
    #[error("no preceding version directory found for {0}")]
    NoPrecedingVersion(String),
}

/// Find the sibling version directory that lexicographically immediately
/// precedes `current_ext_dir`, among directories sharing its name prefix
/// (the part before the final `-<semver>` component).
pub fn find_preceding_version_dir(current_ext_dir: &Path) -> Result<PathBuf, UpdateError> {
    let current_name = current_ext_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| UpdateError::NoParentDir(current_ext_dir.display().to_string()))?;
    let prefix = version_prefix(current_name);

    let parent = current_ext_dir
        .parent()
        .ok_or_else(|| UpdateError::NoParentDir(current_ext_dir.display().to_string()))?;

    let entries = std::fs::read_dir(parent)
        .map_err(|e| UpdateError::ListDir(parent.display().to_string(), e))?;

    let mut candidates: Vec<String> = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else { continue };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != current_name && name.starts_with(&prefix) && name < current_name.to_string() {
            candidates.push(name);
        }
    }

    candidates
        .into_iter()
        .max()
        .map(|name| parent.join(name))
        .ok_or_else(|| UpdateError::NoPrecedingVersion(current_ext_dir.display().to_string()))
}

fn version_prefix(dir_name: &str) -> String {
    match dir_name.rfind('-') {
        Some(idx) => dir_name[..=idx].to_string(),
        None => dir_name.to_string(),
    }
}

/// Copy `ExtState.json`, `CoreState.json`, and any `*.bak` file from the
/// preceding version's `config/` directory into the current one's.
fn carry_forward_artifacts(preceding_config_dir: &Path, current_config_dir: &Path) -> Result<(), ExitError> {
    std::fs::create_dir_all(current_config_dir).map_err(handler_failed)?;

    for name in ["ExtState.json", "CoreState.json"] {
        let src = preceding_config_dir.join(name);
        if src.exists() {
            std::fs::copy(&src, current_config_dir.join(name)).map_err(handler_failed)?;
        }
    }

    let entries = std::fs::read_dir(preceding_config_dir).map_err(handler_failed)?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("bak") {
            if let Some(name) = path.file_name() {
                std::fs::copy(&path, current_config_dir.join(name)).map_err(handler_failed)?;
            }
        }
    }
    Ok(())
}

/// `current_ext_dir` is this extension version's installation root; its
/// `config/` subdirectory is where carried-forward state lands.
pub fn run(current_ext_dir: &Path) -> Result<(), ExitError> {
    let preceding_dir = find_preceding_version_dir(current_ext_dir).map_err(handler_failed)?;
    carry_forward_artifacts(&preceding_dir.join("config"), &current_ext_dir.join("config"))
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
