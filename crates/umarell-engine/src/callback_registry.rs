// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reverse-callback URL registry for live stages, consulted by the HTTP
//! listing routes.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use umarell_core::StageName;

#[derive(Debug, Default)]
pub struct CallbackRegistry {
    urls: RwLock<BTreeMap<StageName, String>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, stage: StageName, url: impl Into<String>) {
        self.urls.write().insert(stage, url.into());
    }

    pub fn remove(&self, stage: &StageName) {
        self.urls.write().remove(stage);
    }

    /// All callback URLs, sorted (the backing map is already ordered by
    /// stage name, which also yields a stable, sorted URL listing since
    /// URLs are derived deterministically from stage names).
    pub fn list(&self) -> Vec<String> {
        self.urls.read().values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "callback_registry_tests.rs"]
mod tests;
