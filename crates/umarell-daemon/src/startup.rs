// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a loaded [`Config`] into a running [`DaemonState`]: one engine
//! per project, merge-tracked checkouts registered with each detector,
//! and static branches pre-deployed the moment the daemon comes up
//! rather than waiting for their first push.

use crate::DaemonState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use umarell_config::{Config, ConfigError, ProjectConfig, DEFAULT_KEY};
use umarell_core::{match_stage, Notification, StageName, Vars};
use umarell_engine::{spawn_project, BuildSpawnInfo, CallbackRegistry, MergeCheckMode};
use umarell_store::{MemoryStore, ResultStore, SqliteStore, StoreError};
use umarell_vcs::git::GitAdapter;
use umarell_vcs::{VcsAdapter, VcsError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open result store: {0}")]
    Store(#[from] StoreError),
    #[error("could not read starting commit of checkout {dir}: {source}")]
    Checkout {
        dir: PathBuf,
        #[source]
        source: VcsError,
    },
}

/// Load `config_path`, wire one [`umarell_engine::ProjectEngine`] per
/// configured project, and pre-create any `staticBranches` stages.
pub async fn build_daemon_state(config_path: &std::path::Path) -> Result<Arc<DaemonState>, StartupError> {
    let config = Arc::new(Config::load(config_path)?);
    let vcs: Arc<dyn VcsAdapter> = Arc::new(GitAdapter::new());
    build_from_config_inner(config, vcs).await
}

/// Test seam: identical to [`build_daemon_state`] but takes an explicit
/// VCS adapter instead of always shelling out to a real `git` binary.
async fn build_from_config_inner(
    config: Arc<Config>,
    vcs: Arc<dyn VcsAdapter>,
) -> Result<Arc<DaemonState>, StartupError> {
    let store: Arc<dyn ResultStore> = match &config.database {
        Some(path) => Arc::new(SqliteStore::open(path, config.table.as_deref())?),
        None => Arc::new(MemoryStore::new()),
    };
    let semaphore = if config.limit_builds == 0 {
        None
    } else {
        Some(Arc::new(Semaphore::new(config.limit_builds as usize)))
    };
    let registry = Arc::new(CallbackRegistry::new());

    let mut projects = HashMap::new();
    for (name, project_cfg) in &config.environments {
        let mut checkouts = Vec::new();
        for (branch, dir) in &project_cfg.merges {
            let sha = last_commit(&vcs, dir).await?;
            match resolve_stages(project_cfg, branch, name).into_iter().next() {
                Some(stage) => checkouts.push((stage, dir.clone(), sha)),
                None => tracing::warn!(
                    project = %name,
                    %branch,
                    "merges entry has no matching stage template, not tracking for merge detection"
                ),
            }
        }

        let engine = spawn_project(
            name.clone(),
            checkouts,
            vcs.clone(),
            registry.clone(),
            MergeCheckMode::CommitsOnly,
        );

        for branch in &project_cfg.static_branches {
            let sha = match project_cfg.merges.get(branch) {
                Some(dir) => last_commit(&vcs, dir).await?,
                None => String::new(),
            };
            let stages = resolve_stages(project_cfg, branch, name);
            if stages.is_empty() {
                tracing::warn!(
                    project = %name,
                    %branch,
                    "static branch has no matching stage template, skipping"
                );
                continue;
            }
            for stage in stages {
                let spawn_info = BuildSpawnInfo {
                    project: name.clone(),
                    stage: stage.clone(),
                    workspaces_dir: config.workspaces_dir.clone(),
                    command_timeout: config.command_timeout,
                    config: config.clone(),
                    store: store.clone(),
                    semaphore: semaphore.clone(),
                };
                let callback_url = format!("{name}/jenkins/git/notifyCommit?branches={branch}");
                let notification = Notification::push(name.clone(), branch.clone(), sha.clone());
                engine
                    .coordinator
                    .push(stage, spawn_info, branch.clone(), None, callback_url, notification)
                    .await;
            }
        }

        projects.insert(name.clone(), engine);
    }

    Ok(Arc::new(DaemonState {
        config,
        projects,
        registry,
        store,
        semaphore,
    }))
}

async fn last_commit(vcs: &Arc<dyn VcsAdapter>, dir: &std::path::Path) -> Result<String, StartupError> {
    let commits = vcs
        .last_commits(dir, 1)
        .await
        .map_err(|source| StartupError::Checkout {
            dir: dir.to_path_buf(),
            source,
        })?;
    Ok(commits.into_iter().next().map(|c| c.hash).unwrap_or_default())
}

/// Resolve `branch`'s stage templates the same way a live push would:
/// an exact or pattern match in `branches`, falling back to
/// `__default__`. A `staticBranches` entry with neither is a config
/// mistake we log and skip rather than fail the whole daemon over.
fn resolve_stages(project_cfg: &ProjectConfig, branch: &str, project: &str) -> Vec<StageName> {
    let Some(templates) = match_stage(branch, &project_cfg.branches)
        .or_else(|| project_cfg.branches.get(DEFAULT_KEY).map(|v| v.as_slice()))
    else {
        return Vec::new();
    };

    templates
        .iter()
        .map(|template| {
            let mut vars = Vars::new();
            vars.set("ENV", project.to_string());
            vars.set("BRANCH", branch.to_string());
            StageName::new(vars.substitute(template))
        })
        .collect()
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
