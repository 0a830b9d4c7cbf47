// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle requests and persisted results for a single stage.

use crate::notification::Notification;
use crate::stage::StageName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// The lifecycle action a build actor is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildAct {
    Create,
    /// The stage exists but is switching to a different branch.
    Change,
    /// The stage exists and is redeploying the same branch.
    Update,
    Destroy,
}

impl BuildAct {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildAct::Create => "create",
            BuildAct::Change => "change",
            BuildAct::Update => "update",
            BuildAct::Destroy => "destroy",
        }
    }
}

/// One enqueued unit of work for a build actor, with a completion signal
/// the coordinator awaits to preserve per-stage FIFO ordering.
#[derive(Debug)]
pub struct BuildRequest {
    pub act: BuildAct,
    pub notification: Notification,
    pub done: oneshot::Sender<()>,
}

impl BuildRequest {
    pub fn new(act: BuildAct, notification: Notification) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                act,
                notification,
                done: tx,
            },
            rx,
        )
    }
}

/// A finished (or timed-out) command execution, ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResult {
    pub stage: StageName,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub act: BuildAct,
    pub ticket: Option<u64>,
    pub sha1: String,
    pub branch: String,
    pub cmd: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}
