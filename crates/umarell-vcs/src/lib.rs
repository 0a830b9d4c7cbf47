// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version-control adapter: commit ancestry, recent history, current
//! branch, all shelled out to a real `git` binary by default.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub mod git;

#[cfg(feature = "test-support")]
pub mod fake;

/// One commit: its own hash and its parent hashes, in the order `git
/// log` reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub parents: Vec<String>,
}

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("git command failed: {0}")]
    CommandFailed(String),
    #[error("git command timed out")]
    Timeout,
    #[error("could not parse git output: {0}")]
    ParseFailed(String),
    #[error(transparent)]
    Exec(#[from] umarell_shell::ExecError),
}

/// The fixed timeout applied to every VCS shell-out, matching the
/// reference implementation's hardcoded short timeout for local git
/// operations against an already-checked-out working directory.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait VcsAdapter: Send + Sync {
    /// Commits reachable from `dir`'s HEAD but not from `baseline`,
    /// i.e. `git log baseline..HEAD`.
    async fn ancestry_since(&self, dir: &Path, baseline: &str) -> Result<Vec<Commit>, VcsError>;

    /// The `n` most recent commits on `dir`'s current HEAD.
    async fn last_commits(&self, dir: &Path, n: usize) -> Result<Vec<Commit>, VcsError>;

    /// The name of the branch currently checked out in `dir`.
    async fn current_branch(&self, dir: &Path) -> Result<String, VcsError>;
}

/// Tolerant hash equality: if the two hashes differ in length (one is an
/// abbreviation of the other), the longer is truncated to the shorter's
/// length before comparing bytes.
pub fn hashes_equal(a: &str, b: &str) -> bool {
    let len = a.len().min(b.len());
    if len == 0 {
        return a.is_empty() && b.is_empty();
    }
    a.as_bytes()[..len] == b.as_bytes()[..len]
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
