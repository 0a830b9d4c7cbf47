// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires a coordinator and its merge detector together for one project,
//! resolving the construction cycle between them (§5: the coordinator
//! can send into the detector; the detector calls back into the
//! coordinator, but only ever via a fire-and-forget task).

use crate::callback_registry::CallbackRegistry;
use crate::coordinator::{self, CoordinatorHandle};
use crate::merge_detector::{self, DetectorHandle, MergeCheckMode};
use std::path::PathBuf;
use std::sync::Arc;
use umarell_core::StageName;
use umarell_vcs::VcsAdapter;

/// A project's two top-level actors, ready to receive pushes.
pub struct ProjectEngine {
    pub coordinator: CoordinatorHandle,
    pub detector: DetectorHandle,
}

pub fn spawn_project(
    project: String,
    checkouts: Vec<(StageName, PathBuf, String)>,
    vcs: Arc<dyn VcsAdapter>,
    callback_registry: Arc<CallbackRegistry>,
    mode: MergeCheckMode,
) -> ProjectEngine {
    let (coordinator_handle, coordinator_rx) = coordinator::new_handle();
    let detector_handle = merge_detector::spawn(
        checkouts,
        vcs,
        coordinator_handle.clone(),
        callback_registry.clone(),
        mode,
    );
    coordinator::start(project, callback_registry, detector_handle.clone(), coordinator_rx);

    ProjectEngine {
        coordinator: coordinator_handle,
        detector: detector_handle,
    }
}
