// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON configuration model and loader.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod duration;

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;
use thiserror::Error;

pub const DEFAULT_KEY: &str = "__default__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("branch_regexp {0:?} does not compile: {1}")]
    InvalidBranchRegexp(String, regex::Error),
    #[error("branch_regexp must have at least one capture group")]
    BranchRegexpNoCaptureGroup,
    #[error("project {0:?} has no __default__ template and no branches/staticBranches/merges entries")]
    ProjectHasNoCoverage(String),
    #[error("environments map is empty")]
    NoEnvironments,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandSet {
    #[serde(rename = "change", default)]
    pub change: Option<Vec<String>>,
    #[serde(rename = "create", default)]
    pub create: Option<Vec<String>>,
    #[serde(rename = "update", default)]
    pub update: Option<Vec<String>>,
    #[serde(rename = "destroy", default)]
    pub destroy: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub branches: BTreeMap<String, Vec<String>>,
    #[serde(rename = "staticBranches", default)]
    pub static_branches: Vec<String>,
    #[serde(default)]
    pub merges: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub commands: Option<CommandSet>,
}

impl ProjectConfig {
    fn has_any_coverage(&self) -> bool {
        self.branches.contains_key(DEFAULT_KEY)
            || !self.branches.is_empty()
            || !self.static_branches.is_empty()
            || !self.merges.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    #[serde(default)]
    branch_regexp: Option<String>,
    workspaces_dir: PathBuf,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    limit_builds: u32,
    #[serde(with = "duration::option", default)]
    results_duration: Option<StdDuration>,
    #[serde(with = "duration::option", default)]
    results_cleanup: Option<StdDuration>,
    #[serde(with = "duration::option", default)]
    command_timeout: Option<StdDuration>,
    #[serde(default)]
    commands: CommandSet,
    environments: BTreeMap<String, ProjectConfig>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub branch_regexp: Option<Regex>,
    pub workspaces_dir: PathBuf,
    pub database: Option<String>,
    pub table: Option<String>,
    /// 0 means unlimited.
    pub limit_builds: u32,
    pub results_duration: StdDuration,
    pub results_cleanup: StdDuration,
    pub command_timeout: StdDuration,
    pub commands: CommandSet,
    pub environments: BTreeMap<String, ProjectConfig>,
}

const DEFAULT_RESULTS_DURATION: StdDuration = StdDuration::from_secs(7 * 24 * 3600);
const DEFAULT_RESULTS_CLEANUP: StdDuration = StdDuration::from_secs(3600);
const DEFAULT_COMMAND_TIMEOUT: StdDuration = StdDuration::from_secs(600);

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        let branch_regexp = raw
            .branch_regexp
            .map(|pattern| {
                let re = Regex::new(&pattern)
                    .map_err(|e| ConfigError::InvalidBranchRegexp(pattern.clone(), e))?;
                if re.captures_len() < 2 {
                    return Err(ConfigError::BranchRegexpNoCaptureGroup);
                }
                Ok(re)
            })
            .transpose()?;

        if raw.environments.is_empty() {
            return Err(ConfigError::NoEnvironments);
        }
        for (name, project) in &raw.environments {
            if !project.has_any_coverage() {
                return Err(ConfigError::ProjectHasNoCoverage(name.clone()));
            }
        }

        Ok(Config {
            branch_regexp,
            workspaces_dir: raw.workspaces_dir,
            database: raw.database,
            table: raw.table,
            limit_builds: raw.limit_builds,
            results_duration: raw.results_duration.unwrap_or(DEFAULT_RESULTS_DURATION),
            results_cleanup: raw.results_cleanup.unwrap_or(DEFAULT_RESULTS_CLEANUP),
            command_timeout: raw.command_timeout.unwrap_or(DEFAULT_COMMAND_TIMEOUT),
            commands: raw.commands,
            environments: raw.environments,
        })
    }

    /// The effective command template for `act`, preferring the
    /// project's override over the global default.
    pub fn command_for<'a>(&'a self, project: &'a str, act: &str) -> Option<&'a [String]> {
        let project_cfg = self.environments.get(project)?;
        let pick = |set: &'a CommandSet| match act {
            "create" => set.create.as_deref(),
            "change" => set.change.as_deref(),
            "update" => set.update.as_deref(),
            "destroy" => set.destroy.as_deref(),
            _ => None,
        };
        project_cfg
            .commands
            .as_ref()
            .and_then(pick)
            .or_else(|| pick(&self.commands))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
