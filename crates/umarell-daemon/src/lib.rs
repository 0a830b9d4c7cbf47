// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ties the orchestration engine to the outside world: the JSON config,
//! the HTTP webhook surface, the notification dispatcher, and the
//! periodic results-cleanup ticker.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cleanup;
pub mod dispatcher;
pub mod http;
pub mod startup;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use umarell_config::Config;
use umarell_engine::{CallbackRegistry, ProjectEngine};
use umarell_store::ResultStore;

pub use dispatcher::DispatcherHandle;
pub use startup::{build_daemon_state, StartupError};

/// Everything the dispatcher and HTTP façade need to route a
/// notification: the loaded config, one engine per project, the shared
/// callback registry, the result store, and the global concurrency gate.
pub struct DaemonState {
    pub config: Arc<Config>,
    pub projects: HashMap<String, ProjectEngine>,
    pub registry: Arc<CallbackRegistry>,
    pub store: Arc<dyn ResultStore>,
    /// `None` means no global concurrency limit.
    pub semaphore: Option<Arc<Semaphore>>,
}
