// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process result store: a map of stage name to its result history.

use crate::{ResultStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use umarell_core::BuildResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    results: Mutex<HashMap<String, Vec<BuildResult>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn add(&self, result: BuildResult) -> Result<(), StoreError> {
        self.results
            .lock()
            .entry(result.stage.as_str().to_string())
            .or_default()
            .push(result);
        Ok(())
    }

    async fn get(&self, stage: &str) -> Result<Vec<BuildResult>, StoreError> {
        Ok(self.results.lock().get(stage).cloned().unwrap_or_default())
    }

    async fn delete(&self, stage: &str) -> Result<(), StoreError> {
        self.results.lock().remove(stage);
        Ok(())
    }

    async fn clean(&self, before: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut removed = 0u64;
        let mut results = self.results.lock();
        for list in results.values_mut() {
            let before_len = list.len();
            list.retain(|r| r.end >= before);
            removed += (before_len - list.len()) as u64;
        }
        results.retain(|_, list| !list.is_empty());
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
