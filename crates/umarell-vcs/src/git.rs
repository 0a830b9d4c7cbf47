// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `git`-CLI-backed implementation of [`crate::VcsAdapter`].

use crate::{Commit, VcsAdapter, VcsError, GIT_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use umarell_shell::run_with_timeout;

/// Shells out to the system `git` binary found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct GitAdapter;

impl GitAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn parse_log_line(line: &str) -> Option<Commit> {
    let mut parts = line.split_whitespace();
    let hash = parts.next()?.to_string();
    let parents = parts.map(str::to_string).collect();
    Some(Commit { hash, parents })
}

async fn run_git(dir: &Path, args: &[&str]) -> Result<String, VcsError> {
    let argv: Vec<String> = std::iter::once("git".to_string())
        .chain(args.iter().map(|a| a.to_string()))
        .collect();
    let output = run_with_timeout(&argv, dir, GIT_TIMEOUT).await?;
    if output.timed_out {
        return Err(VcsError::Timeout);
    }
    match output.exit_code {
        Some(0) => Ok(output.stdout),
        _ => Err(VcsError::CommandFailed(output.stderr)),
    }
}

#[async_trait]
impl VcsAdapter for GitAdapter {
    async fn ancestry_since(&self, dir: &Path, baseline: &str) -> Result<Vec<Commit>, VcsError> {
        let range = format!("{baseline}..HEAD");
        let out = run_git(dir, &["log", "--format=%H %P", &range]).await?;
        Ok(out.lines().filter_map(parse_log_line).collect())
    }

    async fn last_commits(&self, dir: &Path, n: usize) -> Result<Vec<Commit>, VcsError> {
        let count = format!("-{n}");
        let out = run_git(dir, &["log", "--format=%H %P", &count]).await?;
        Ok(out.lines().filter_map(parse_log_line).collect())
    }

    async fn current_branch(&self, dir: &Path) -> Result<String, VcsError> {
        let out = run_git(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let branch = out.trim();
        if branch.is_empty() {
            return Err(VcsError::ParseFailed("empty branch name".to_string()));
        }
        Ok(branch.to_string())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
