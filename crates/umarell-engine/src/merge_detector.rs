// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project merge detector: learns branch SHAs from pushes and,
//! on every push to a tracked reference checkout, scans the new history
//! for merged feature branches and triggers their destruction.

use crate::callback_registry::CallbackRegistry;
use crate::coordinator::CoordinatorHandle;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use umarell_core::{Notification, StageName};
use umarell_vcs::{hashes_equal, VcsAdapter};

/// Whether merge containment is decided from commit hashes alone, or
/// also considers each commit's parent hashes (catching merge commits
/// whose own hash never appears verbatim but whose parent does).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeCheckMode {
    CommitsOnly,
    IncludeParents,
}

/// What the coordinator hands the detector after accepting a push.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub stage: StageName,
    pub notification: Notification,
    pub token: u64,
}

enum DetectorMsg {
    Register(MergeRequest),
    Del(StageName),
}

#[derive(Clone)]
pub struct DetectorHandle {
    sender: mpsc::Sender<DetectorMsg>,
}

impl DetectorHandle {
    pub async fn register(&self, req: MergeRequest) {
        if self.sender.send(DetectorMsg::Register(req)).await.is_err() {
            tracing::warn!("detector queue closed, dropping merge request");
        }
    }

    pub async fn del(&self, stage: StageName) {
        let _ = self.sender.send(DetectorMsg::Del(stage)).await;
    }
}

struct Checkout {
    dir: PathBuf,
    last_sha: String,
}

struct State {
    checkouts: HashMap<StageName, Checkout>,
    versions: HashMap<StageName, String>,
    unremovable: HashSet<StageName>,
    vcs: Arc<dyn VcsAdapter>,
    coordinator: CoordinatorHandle,
    callback_registry: Arc<CallbackRegistry>,
    mode: MergeCheckMode,
}

/// Spawn the detector's task. `checkouts` is the project's configured
/// set of long-lived reference branches: stage name, working directory,
/// and its initial tracked SHA (the checkout's current HEAD).
pub fn spawn(
    checkouts: Vec<(StageName, PathBuf, String)>,
    vcs: Arc<dyn VcsAdapter>,
    coordinator: CoordinatorHandle,
    callback_registry: Arc<CallbackRegistry>,
    mode: MergeCheckMode,
) -> DetectorHandle {
    let (tx, rx) = mpsc::channel(256);
    let unremovable = checkouts.iter().map(|(s, _, _)| s.clone()).collect();
    let checkouts = checkouts
        .into_iter()
        .map(|(stage, dir, sha)| (stage, Checkout { dir, last_sha: sha }))
        .collect();
    let state = State {
        checkouts,
        versions: HashMap::new(),
        unremovable,
        vcs,
        coordinator,
        callback_registry,
        mode,
    };
    tokio::spawn(run(state, rx));
    DetectorHandle { sender: tx }
}

async fn run(mut state: State, mut rx: mpsc::Receiver<DetectorMsg>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            DetectorMsg::Register(req) => handle_register(&mut state, req).await,
            DetectorMsg::Del(stage) => {
                state.versions.remove(&stage);
            }
        }
    }
}

async fn handle_register(state: &mut State, req: MergeRequest) {
    if state.checkouts.contains_key(&req.stage) {
        scan_for_merges(state, &req).await;
    } else if state.unremovable.contains(&req.stage) {
        tracing::warn!(stage = %req.stage, "refusing to track an unremovable stage as a mergeable version");
    } else {
        state.versions.insert(req.stage.clone(), req.notification.sha1.clone());
    }
}

async fn scan_for_merges(state: &mut State, req: &MergeRequest) {
    let Some(checkout) = state.checkouts.get(&req.stage) else {
        return;
    };
    if checkout.last_sha.is_empty() {
        tracing::warn!(stage = %req.stage, "no baseline sha recorded, skipping merge scan");
        return;
    }

    let commits = match state.vcs.ancestry_since(&checkout.dir, &checkout.last_sha).await {
        Ok(c) => c,
        Err(err) => {
            tracing::error!(stage = %req.stage, %err, "merge scan failed, baseline not advanced");
            return;
        }
    };

    let mut reachable: HashSet<String> = HashSet::new();
    for commit in &commits {
        reachable.insert(commit.hash.clone());
        if state.mode == MergeCheckMode::IncludeParents {
            reachable.extend(commit.parents.iter().cloned());
        }
    }

    let mut merged = Vec::new();
    for (stage, sha) in &state.versions {
        if state.unremovable.contains(stage) {
            continue;
        }
        if reachable.iter().any(|h| hashes_equal(h, sha)) {
            merged.push(stage.clone());
        }
    }

    for stage in &merged {
        state.callback_registry.remove(stage);
        state.versions.remove(stage);
        let coordinator = state.coordinator.clone();
        let notification = req.notification.clone();
        let token = req.token;
        let stage = stage.clone();
        // Fire-and-forget: calling destroy() synchronously here would
        // deadlock, since the coordinator is blocked waiting on us to
        // finish processing this very request.
        tokio::spawn(async move {
            coordinator.destroy(stage, notification, token as i64).await;
        });
    }

    if let Some(checkout) = state.checkouts.get_mut(&req.stage) {
        checkout.last_sha = req.notification.sha1.clone();
    }
}

#[cfg(test)]
#[path = "merge_detector_tests.rs"]
mod tests;
