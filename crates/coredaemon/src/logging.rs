// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup, mirroring the handler's one-rolling-file-per-invocation
//! convention: `log/<ISO-timestamp>_<Action>.log`.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot create log directory {0}: {1}")]
    CreateDir(String, std::io::Error),
}

/// Build the log file name for one core run: `<ISO-timestamp>_<Action>.log`.
pub fn log_file_name(now: DateTime<Utc>, action: &str) -> String {
    let timestamp = now.format("%Y%m%dT%H%M%SZ");
    format!("{timestamp}_{action}.log")
}

/// Install a global tracing subscriber writing to `log_dir/<file_name>`,
/// non-blocking, filtered by `RUST_LOG` (defaulting to `info`). The
/// returned guard must be held for the lifetime of the process.
pub fn init(
    log_dir: &Path,
    file_name: &str,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LoggingError> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| LoggingError::CreateDir(log_dir.display().to_string(), e))?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
