// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory DAG standing in for a real git checkout, for testing the
//! merge detector without shelling out.

use crate::{Commit, VcsAdapter, VcsError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A fake repository: a single linear-or-branching commit history keyed
/// by directory path, with a mutable "current HEAD" per directory.
#[derive(Debug, Default)]
pub struct FakeVcsAdapter {
    repos: Mutex<HashMap<PathBuf, Repo>>,
}

#[derive(Debug, Default, Clone)]
struct Repo {
    commits: Vec<Commit>,
    head: String,
    branch: String,
}

impl FakeVcsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or extend a repo at `dir` with `commits` appended in
    /// order (most recent last), updating HEAD to the last one.
    pub fn push_commits(&self, dir: &Path, commits: impl IntoIterator<Item = Commit>) {
        let mut repos = self.repos.lock();
        let repo = repos.entry(dir.to_path_buf()).or_default();
        for c in commits {
            repo.head = c.hash.clone();
            repo.commits.push(c);
        }
    }

    pub fn set_branch(&self, dir: &Path, branch: impl Into<String>) {
        let mut repos = self.repos.lock();
        repos.entry(dir.to_path_buf()).or_default().branch = branch.into();
    }
}

#[async_trait]
impl VcsAdapter for FakeVcsAdapter {
    async fn ancestry_since(&self, dir: &Path, baseline: &str) -> Result<Vec<Commit>, VcsError> {
        let repos = self.repos.lock();
        let Some(repo) = repos.get(dir) else {
            return Ok(Vec::new());
        };
        let pos = repo.commits.iter().position(|c| c.hash == baseline);
        let slice = match pos {
            Some(idx) => &repo.commits[idx + 1..],
            None => &repo.commits[..],
        };
        Ok(slice.iter().rev().cloned().collect())
    }

    async fn last_commits(&self, dir: &Path, n: usize) -> Result<Vec<Commit>, VcsError> {
        let repos = self.repos.lock();
        let Some(repo) = repos.get(dir) else {
            return Ok(Vec::new());
        };
        Ok(repo.commits.iter().rev().take(n).cloned().collect())
    }

    async fn current_branch(&self, dir: &Path) -> Result<String, VcsError> {
        let repos = self.repos.lock();
        Ok(repos.get(dir).map(|r| r.branch.clone()).unwrap_or_default())
    }
}
