// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project coordinator: the single owner of the `stage → build`
//! map and the per-stage lifecycle token, guarding against stale merge
//! detection.

use crate::build_actor::{self, BuildActorHandle, BuildSpawnInfo};
use crate::callback_registry::CallbackRegistry;
use crate::merge_detector::{DetectorHandle, MergeRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use umarell_core::{BuildAct, Notification, StageName};

#[derive(Debug, Clone, Copy)]
pub struct PushOutcome {
    pub token: u64,
}

pub(crate) enum CoordinatorMsg {
    Push {
        stage: StageName,
        spawn_info: BuildSpawnInfo,
        initial_branch: String,
        initial_ticket: Option<u64>,
        callback_url: String,
        notification: Notification,
        reply: oneshot::Sender<PushOutcome>,
    },
    Destroy {
        stage: StageName,
        notification: Notification,
        /// `-1` denotes a direct user-initiated delete, bypassing the
        /// stale-merge guard.
        token: i64,
        reply: Option<oneshot::Sender<()>>,
    },
}

#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<CoordinatorMsg>,
}

impl CoordinatorHandle {
    pub async fn push(
        &self,
        stage: StageName,
        spawn_info: BuildSpawnInfo,
        initial_branch: String,
        initial_ticket: Option<u64>,
        callback_url: String,
        notification: Notification,
    ) -> PushOutcome {
        let (reply, rx) = oneshot::channel();
        let msg = CoordinatorMsg::Push {
            stage,
            spawn_info,
            initial_branch,
            initial_ticket,
            callback_url,
            notification,
            reply,
        };
        if self.sender.send(msg).await.is_err() {
            tracing::error!("coordinator queue closed while pushing");
            return PushOutcome { token: 0 };
        }
        rx.await.unwrap_or(PushOutcome { token: 0 })
    }

    pub async fn destroy(&self, stage: StageName, notification: Notification, token: i64) {
        let (reply, rx) = oneshot::channel();
        let msg = CoordinatorMsg::Destroy {
            stage,
            notification,
            token,
            reply: Some(reply),
        };
        if self.sender.send(msg).await.is_ok() {
            let _ = rx.await;
        }
    }
}

struct StageEntry {
    handle: BuildActorHandle,
}

struct State {
    project: String,
    stages: HashMap<StageName, StageEntry>,
    tokens: HashMap<StageName, u64>,
    callback_registry: Arc<CallbackRegistry>,
    detector: DetectorHandle,
}

/// Construct a coordinator handle and its matching receiver without
/// starting the actor task yet. This lets a detector be spawned first
/// with a working `CoordinatorHandle` to call back into, breaking the
/// coordinator↔detector construction cycle; pair with [`start`].
pub(crate) fn new_handle() -> (CoordinatorHandle, mpsc::Receiver<CoordinatorMsg>) {
    let (tx, rx) = mpsc::channel(256);
    (CoordinatorHandle { sender: tx }, rx)
}

/// Start the coordinator's actor task over a receiver obtained from
/// [`new_handle`].
pub(crate) fn start(
    project: String,
    callback_registry: Arc<CallbackRegistry>,
    detector: DetectorHandle,
    rx: mpsc::Receiver<CoordinatorMsg>,
) {
    let state = State {
        project,
        stages: HashMap::new(),
        tokens: HashMap::new(),
        callback_registry,
        detector,
    };
    tokio::spawn(run(state, rx));
}

async fn run(mut state: State, mut rx: mpsc::Receiver<CoordinatorMsg>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            CoordinatorMsg::Push {
                stage,
                spawn_info,
                initial_branch,
                initial_ticket,
                callback_url,
                notification,
                reply,
            } => {
                let outcome = handle_push(
                    &mut state,
                    stage,
                    spawn_info,
                    initial_branch,
                    initial_ticket,
                    callback_url,
                    notification,
                )
                .await;
                let _ = reply.send(outcome);
            }
            CoordinatorMsg::Destroy {
                stage,
                notification,
                token,
                reply,
            } => {
                handle_destroy(&mut state, stage, notification, token).await;
                if let Some(reply) = reply {
                    let _ = reply.send(());
                }
            }
        }
    }
}

async fn handle_push(
    state: &mut State,
    stage: StageName,
    spawn_info: BuildSpawnInfo,
    initial_branch: String,
    initial_ticket: Option<u64>,
    callback_url: String,
    notification: Notification,
) -> PushOutcome {
    let token = {
        let entry = state.tokens.entry(stage.clone()).or_insert(0);
        *entry += 1;
        *entry
    };

    let act = if let std::collections::hash_map::Entry::Vacant(slot) = state.stages.entry(stage.clone()) {
        let handle = build_actor::spawn(spawn_info, initial_branch, initial_ticket);
        slot.insert(StageEntry { handle });
        state.callback_registry.set(stage.clone(), callback_url);
        BuildAct::Create
    } else {
        BuildAct::Change
    };

    if let Some(entry) = state.stages.get(&stage) {
        entry.handle.request(act, notification.clone()).await;
    }

    state
        .detector
        .register(MergeRequest {
            stage,
            notification,
            token,
        })
        .await;

    PushOutcome { token }
}

async fn handle_destroy(state: &mut State, stage: StageName, notification: Notification, token: i64) {
    let Some(&current_token) = state.tokens.get(&stage) else {
        tracing::info!(stage = %state_project_tag(state, &stage), "ghost destroy, stage not tracked");
        return;
    };

    if token >= 0 && current_token > token as u64 {
        tracing::info!(stage = %stage, current_token, requested = token, "ignoring stale merge-triggered destroy");
        return;
    }

    if let Some(entry) = state.stages.remove(&stage) {
        entry.handle.request(BuildAct::Destroy, notification).await;
    }
    state.tokens.remove(&stage);
    state.callback_registry.remove(&stage);
}

fn state_project_tag(state: &State, stage: &StageName) -> String {
    format!("{}/{}", state.project, stage)
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
