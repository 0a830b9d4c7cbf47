// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic results-retention sweep (C11).

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use umarell_store::ResultStore;

/// Spawn the cleanup ticker. Fires every `interval`, asking the store to
/// drop any result whose `end` timestamp is older than `retention`.
pub fn spawn(store: Arc<dyn ResultStore>, interval: Duration, retention: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // the first tick fires immediately
        loop {
            ticker.tick().await;
            let window = chrono::Duration::from_std(retention).unwrap_or_else(|_| chrono::Duration::zero());
            let before = Utc::now() - window;
            match store.clean(before).await {
                Ok(removed) if removed > 0 => tracing::info!(removed, "cleaned up stale build results"),
                Ok(_) => {}
                Err(err) => tracing::error!(%err, "results cleanup sweep failed"),
            }
        }
    });
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
