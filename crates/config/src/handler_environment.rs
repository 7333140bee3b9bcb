// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `HandlerEnvironment.json` parsing. The host agent drops this file next to
//! the extension's installation directory; every other path the extension
//! touches (config, status, log, events) is derived from it rather than
//! hardcoded.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerEnvironmentError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },
    #[error("malformed HandlerEnvironment.json at {path}: {source}")]
    Parse { path: String, #[source] source: serde_json::Error },
    #[error("HandlerEnvironment.json at {path} has no entries")]
    Empty { path: String },
}

#[derive(Debug, Deserialize)]
struct HandlerEnvironmentFile {
    #[serde(rename = "handlerEnvironment")]
    handler_environment: RawHandlerEnvironment,
}

#[derive(Debug, Deserialize)]
struct RawHandlerEnvironment {
    #[serde(rename = "configFolder")]
    config_folder: String,
    #[serde(rename = "statusFolder")]
    status_folder: String,
    #[serde(rename = "logFolder")]
    log_folder: String,
    #[serde(rename = "eventsFolder")]
    events_folder: String,
}

/// The directories an extension installation reads and writes, derived from
/// `HandlerEnvironment.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPaths {
    pub config_dir: PathBuf,
    pub status_dir: PathBuf,
    pub log_dir: PathBuf,
    pub events_dir: PathBuf,
}

/// Parse `HandlerEnvironment.json` at `path`. The file is a JSON array; only
/// the first element is used, matching the host agent's own convention.
pub fn load_handler_environment(path: &Path) -> Result<ExtensionPaths, HandlerEnvironmentError> {
    let path_str = path.display().to_string();
    let bytes = std::fs::read(path)
        .map_err(|source| HandlerEnvironmentError::Read { path: path_str.clone(), source })?;
    let entries: Vec<HandlerEnvironmentFile> = serde_json::from_slice(&bytes)
        .map_err(|source| HandlerEnvironmentError::Parse { path: path_str.clone(), source })?;
    let first = entries
        .into_iter()
        .next()
        .ok_or(HandlerEnvironmentError::Empty { path: path_str })?;
    let env = first.handler_environment;
    Ok(ExtensionPaths {
        config_dir: PathBuf::from(env.config_folder),
        status_dir: PathBuf::from(env.status_folder),
        log_dir: PathBuf::from(env.log_folder),
        events_dir: PathBuf::from(env.events_folder),
    })
}

#[cfg(test)]
#[path = "handler_environment_tests.rs"]
mod tests;
