// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level notification loop (C9): resolves a push/delete event to
//! its project's stage templates and routes each resolved stage to that
//! project's coordinator.

use crate::DaemonState;
use std::sync::Arc;
use tokio::sync::mpsc;
use umarell_core::{extract_ticket, match_stage, Notification, NotificationKind, StageName, Vars};
use umarell_engine::BuildSpawnInfo;

#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::Sender<Notification>,
}

impl DispatcherHandle {
    pub async fn submit(&self, notification: Notification) {
        if self.sender.send(notification).await.is_err() {
            tracing::error!("dispatcher queue closed, dropping notification");
        }
    }
}

pub fn spawn(state: Arc<DaemonState>) -> DispatcherHandle {
    let (tx, mut rx) = mpsc::channel(256);
    tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            handle_one(&state, notification).await;
        }
    });
    DispatcherHandle { sender: tx }
}

async fn handle_one(state: &Arc<DaemonState>, notification: Notification) {
    let Some(project) = state.config.environments.get(&notification.project) else {
        tracing::warn!(project = %notification.project, "notification for unknown project, dropping");
        return;
    };
    let Some(engine) = state.projects.get(&notification.project) else {
        tracing::warn!(project = %notification.project, "no engine wired for project, dropping");
        return;
    };

    let (templates, ticket) = match match_stage(&notification.branch, &project.branches) {
        Some(templates) => (templates.to_vec(), None),
        None => match project.branches.get(umarell_config::DEFAULT_KEY) {
            Some(templates) => {
                let ticket = match &state.config.branch_regexp {
                    Some(pattern) => match extract_ticket(&notification.branch, pattern) {
                        Ok(t) => Some(t),
                        Err(err) => {
                            tracing::warn!(branch = %notification.branch, %err, "ticket extraction failed on default template path, dropping");
                            return;
                        }
                    },
                    None => None,
                };
                (templates.clone(), ticket)
            }
            None => {
                tracing::warn!(branch = %notification.branch, project = %notification.project, "no matching stage template and no default, dropping");
                return;
            }
        },
    };
    if templates.is_empty() {
        tracing::warn!(branch = %notification.branch, "matched stage template list is empty, dropping");
        return;
    }

    for template in &templates {
        let mut vars = Vars::new();
        vars.set("ENV", notification.project.clone());
        if let Some(ticket) = ticket {
            vars.set("TICKET", ticket.to_string());
        }
        vars.set("BRANCH", notification.branch.clone());
        let stage = StageName::new(vars.substitute(template));

        let spawn_info = BuildSpawnInfo {
            project: notification.project.clone(),
            stage: stage.clone(),
            workspaces_dir: state.config.workspaces_dir.clone(),
            command_timeout: state.config.command_timeout,
            config: state.config.clone(),
            store: state.store.clone(),
            semaphore: state.semaphore.clone(),
        };

        match notification.kind {
            NotificationKind::Push => {
                let callback_url = format!(
                    "{}/jenkins/git/notifyCommit?branches={}",
                    notification.project, notification.branch
                );
                engine
                    .coordinator
                    .push(
                        stage,
                        spawn_info,
                        notification.branch.clone(),
                        ticket,
                        callback_url,
                        notification.clone(),
                    )
                    .await;
            }
            NotificationKind::Delete => {
                engine
                    .coordinator
                    .destroy(stage.clone(), notification.clone(), -1)
                    .await;
                engine.detector.del(stage).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
