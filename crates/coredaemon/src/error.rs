// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-level error type composed from each module's own error, the way
//! the teacher's `daemon::lifecycle::LifecycleError` composes
//! `oj_storage::WalError`/`SnapshotError`/`io::Error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to load HandlerEnvironment.json: {0}")]
    HandlerEnvironment(#[from] pk_config::HandlerEnvironmentError),
    #[error("failed to discover or load settings: {0}")]
    Discovery(#[from] pk_config::DiscoveryError),
    #[error("failed to read or write state file: {0}")]
    Store(#[from] pk_storage::StoreError),
    #[error("another core process is still handling sequence {0}")]
    AlreadyRunning(u64),
    #[error("package filter rejected the configured classifications: {0}")]
    Filter(#[from] pk_engine::FilterError),
    #[error("no supported package manager family detected on this host")]
    UnsupportedFamily,
}
