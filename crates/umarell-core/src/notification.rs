// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound push/delete events.

use serde::{Deserialize, Serialize};

/// A notification arriving from the HTTP boundary: either a push to a
/// branch or a request to tear down everything tracking that branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub project: String,
    pub branch: String,
    pub sha1: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Push,
    Delete,
}

impl Notification {
    pub fn push(project: impl Into<String>, branch: impl Into<String>, sha1: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            branch: branch.into(),
            sha1: sha1.into(),
            kind: NotificationKind::Push,
        }
    }

    pub fn delete(project: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            branch: branch.into(),
            sha1: String::new(),
            kind: NotificationKind::Delete,
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
