// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-glob mask matching for `patchesToIncludeInInstallation` /
//! `…ExcludeFromInstallation`. Masks are case-sensitive on package name.

use glob::Pattern;

enum Mask {
    Glob(Pattern),
    /// Invalid glob syntax falls back to a literal match rather than a
    /// parse failure, since the host agent does not validate masks before
    /// delivering them.
    Literal(String),
}

/// A compiled include/exclude mask list. Masks are case-sensitive on
/// package name.
pub struct MaskSet {
    masks: Vec<Mask>,
}

impl MaskSet {
    pub fn compile(masks: &[String]) -> Self {
        let masks = masks
            .iter()
            .map(|m| match Pattern::new(m) {
                Ok(p) => Mask::Glob(p),
                Err(_) => Mask::Literal(m.clone()),
            })
            .collect();
        Self { masks }
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.masks.iter().any(|m| match m {
            Mask::Glob(p) => p.matches(name),
            Mask::Literal(s) => s == name,
        })
    }
}

#[cfg(test)]
#[path = "mask_tests.rs"]
mod tests;
