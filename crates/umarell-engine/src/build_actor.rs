// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-stage actor: serializes lifecycle requests for one stage,
//! runs the configured command under the global concurrency limit, and
//! persists the result.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Semaphore};
use umarell_config::Config;
use umarell_core::{BuildAct, BuildRequest, BuildResult, StageName, Vars};
use umarell_store::ResultStore;

/// Everything a freshly-created build actor needs that does not change
/// over its lifetime.
#[derive(Clone)]
pub struct BuildSpawnInfo {
    pub project: String,
    pub stage: StageName,
    pub workspaces_dir: PathBuf,
    pub command_timeout: Duration,
    pub config: Arc<Config>,
    pub store: Arc<dyn ResultStore>,
    /// `None` means unlimited concurrency.
    pub semaphore: Option<Arc<Semaphore>>,
}

/// A cheaply-clonable reference to a running build actor's input queue.
/// Dropping every clone closes the queue and lets the actor terminate.
#[derive(Clone)]
pub struct BuildActorHandle {
    sender: mpsc::Sender<BuildRequest>,
}

impl BuildActorHandle {
    /// Enqueue a lifecycle request and wait for it to finish executing.
    pub async fn request(&self, act: BuildAct, notification: umarell_core::Notification) {
        let (req, done) = BuildRequest::new(act, notification);
        if self.sender.send(req).await.is_err() {
            tracing::warn!("build actor queue already closed, dropping request");
            return;
        }
        let _ = done.await;
    }
}

struct ActorState {
    current_branch: Option<String>,
    current_sha: Option<String>,
    ticket: Option<u64>,
}

/// Spawn the actor's task and return a handle to it.
pub fn spawn(info: BuildSpawnInfo, initial_branch: String, initial_ticket: Option<u64>) -> BuildActorHandle {
    let (tx, rx) = mpsc::channel(64);
    let state = ActorState {
        current_branch: Some(initial_branch),
        current_sha: None,
        ticket: initial_ticket,
    };
    tokio::spawn(run(info, state, rx));
    BuildActorHandle { sender: tx }
}

async fn run(info: BuildSpawnInfo, mut state: ActorState, mut rx: mpsc::Receiver<BuildRequest>) {
    while let Some(request) = rx.recv().await {
        process_one(&info, &mut state, request).await;
    }
    tracing::info!(stage = %info.stage, "build actor queue drained, terminating");
}

async fn process_one(info: &BuildSpawnInfo, state: &mut ActorState, request: BuildRequest) {
    let BuildRequest {
        act,
        notification,
        done,
    } = request;

    let act = normalize_act(act, &*state, &notification.branch);

    let template = info.config.command_for(&info.project, act.as_str());
    let Some(template) = template else {
        tracing::info!(stage = %info.stage, act = act.as_str(), "no command template configured, nothing to do");
        let _ = done.send(());
        return;
    };

    let mut vars = Vars::new();
    vars.set("ENV", info.project.clone());
    if let Some(ticket) = state.ticket {
        vars.set("TICKET", ticket.to_string());
    }
    vars.set("BRANCH", notification.branch.clone());
    vars.set("STAGE", info.stage.as_str());

    let argv = vars.substitute_all(template.iter().map(String::as_str));

    let _permit = match &info.semaphore {
        Some(sem) => sem.clone().acquire_owned().await.ok(),
        None => None,
    };

    let start = Utc::now();
    let output = umarell_shell::run_with_timeout(&argv, &info.workspaces_dir, info.command_timeout).await;
    let end = Utc::now();
    drop(_permit);

    state.current_branch = Some(notification.branch.clone());
    if !notification.sha1.is_empty() {
        state.current_sha = Some(notification.sha1.clone());
    }

    let result = match output {
        Ok(out) => BuildResult {
            stage: info.stage.clone(),
            start,
            end,
            act,
            ticket: state.ticket,
            sha1: notification.sha1.clone(),
            branch: notification.branch.clone(),
            cmd: argv,
            stdout: out.stdout,
            stderr: out.stderr,
            exit_code: out.exit_code,
        },
        Err(err) => {
            tracing::error!(stage = %info.stage, %err, "command failed to start");
            BuildResult {
                stage: info.stage.clone(),
                start,
                end,
                act,
                ticket: state.ticket,
                sha1: notification.sha1.clone(),
                branch: notification.branch.clone(),
                cmd: argv,
                stdout: String::new(),
                stderr: err.to_string(),
                exit_code: None,
            }
        }
    };

    if let Err(err) = info.store.add(result).await {
        tracing::error!(stage = %info.stage, %err, "failed to persist build result");
    }

    let _ = done.send(());
}

/// Change→Update normalization (spec §4.2 step 1): a push to the branch
/// already deployed on this stage is a redeploy, not a branch switch.
fn normalize_act(act: BuildAct, state: &ActorState, incoming_branch: &str) -> BuildAct {
    if act != BuildAct::Change {
        return act;
    }
    match &state.current_branch {
        Some(current) if current == incoming_branch => BuildAct::Update,
        _ => BuildAct::Change,
    }
}

#[cfg(test)]
#[path = "build_actor_tests.rs"]
mod tests;
