// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable JSON file read/write for the state stores (ExtState, CoreState,
//! StatusFile). Writes go to a sibling temp file and are atomically renamed
//! into place, retried a fixed number of times with linear backoff so a
//! transient I/O error (full disk momentarily, concurrent antivirus scan,
//! NFS hiccup) doesn't fail the whole operation.

use std::path::Path;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error writing {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize value for {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Retry policy for [`write_json_with_retry`] and [`read_json_with_retry`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, one second of added delay per attempt (linear
    /// backoff), matching the small-fixed-limit retry described for
    /// handler file-system operations.
    fn default() -> Self {
        Self { attempts: 3, backoff: Duration::from_secs(1) }
    }
}

/// Serialize `value` to `path` using a write-to-temp + atomic-rename
/// pattern, retrying transient I/O failures under `policy`.
pub fn write_json_with_retry<T: Serialize>(
    path: &Path,
    value: &T,
    policy: RetryPolicy,
) -> Result<(), StoreError> {
    let path_str = path.display().to_string();
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|source| StoreError::Serialize { path: path_str.clone(), source })?;

    let mut last_err = std::io::Error::new(std::io::ErrorKind::InvalidInput, "RetryPolicy::attempts was 0");
    for attempt in 0..policy.attempts {
        match write_atomic(path, &bytes) {
            Ok(()) => return Ok(()),
            Err(source) => {
                warn!(path = %path_str, attempt, "atomic write failed, will retry");
                last_err = source;
                if attempt + 1 < policy.attempts {
                    std::thread::sleep(policy.backoff * (attempt + 1));
                }
            }
        }
    }
    Err(StoreError::Write { path: path_str, source: last_err })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = tmp_sibling(path);
    std::fs::write(&tmp_path, bytes)?;
    std::fs::rename(&tmp_path, path)
}

fn tmp_sibling(path: &Path) -> std::path::PathBuf {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("{file_name}.tmp"))
}

/// Read and parse a JSON file, retrying transient I/O failures under
/// `policy`. A parse failure is not retried — it indicates a corrupt file,
/// not a transient condition.
pub fn read_json_with_retry<T: DeserializeOwned>(
    path: &Path,
    policy: RetryPolicy,
) -> Result<T, StoreError> {
    let path_str = path.display().to_string();
    let mut last_err = std::io::Error::new(std::io::ErrorKind::InvalidInput, "RetryPolicy::attempts was 0");
    for attempt in 0..policy.attempts {
        match std::fs::read(path) {
            Ok(bytes) => {
                return serde_json::from_slice(&bytes)
                    .map_err(|source| StoreError::Parse { path: path_str, source })
            }
            Err(source) => {
                warn!(path = %path_str, attempt, "read failed, will retry");
                last_err = source;
                if attempt + 1 < policy.attempts {
                    std::thread::sleep(policy.backoff * (attempt + 1));
                }
            }
        }
    }
    Err(StoreError::Read { path: path_str, source: last_err })
}

#[cfg(test)]
#[path = "atomic_file_tests.rs"]
mod tests;
