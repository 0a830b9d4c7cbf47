// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence for build results: an in-memory backend for ephemeral
//! deployments and a SQLite-backed one for anything that wants results
//! to survive a restart.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use umarell_core::BuildResult;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("blocking task panicked: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn add(&self, result: BuildResult) -> Result<(), StoreError>;
    async fn get(&self, stage: &str) -> Result<Vec<BuildResult>, StoreError>;
    async fn delete(&self, stage: &str) -> Result<(), StoreError>;
    /// Remove every result whose `end` timestamp is before `before`.
    /// Returns the number of rows removed.
    async fn clean(&self, before: DateTime<Utc>) -> Result<u64, StoreError>;
}
