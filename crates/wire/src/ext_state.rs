// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ExtState.json` — the handler's record of the most recent accepted
//! enable, used to decide whether a new invocation is a re-enable of the
//! same sequence or a new operation.

use chrono::{DateTime, Utc};
use pk_core::Operation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtState {
    #[serde(rename = "extensionSequence")]
    pub extension_sequence: ExtensionSequence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionSequence {
    pub number: u64,
    #[serde(rename = "achieveEnableBy")]
    pub achieve_enable_by: DateTime<Utc>,
    pub operation: Operation,
}

impl ExtState {
    pub fn new(number: u64, achieve_enable_by: DateTime<Utc>, operation: Operation) -> Self {
        Self { extension_sequence: ExtensionSequence { number, achieve_enable_by, operation } }
    }
}

#[cfg(test)]
#[path = "ext_state_tests.rs"]
mod tests;
