// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `umareld`: a single long-lived process that loads a JSON config,
//! wires up one orchestration engine per project, and serves the HTTP
//! webhook façade until asked to stop.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use umarell_daemon::{build_daemon_state, cleanup, dispatcher, http};

#[derive(Debug, Parser)]
#[command(name = "umareld", about = "CI/CD push-to-deploy dispatch daemon")]
struct Args {
    /// Address to listen on, e.g. `:8111` or `0.0.0.0:8111`.
    #[arg(long, default_value = ":8111")]
    listen: String,

    /// Path to the JSON config file.
    config: PathBuf,
}

fn parse_listen_addr(listen: &str) -> anyhow::Result<SocketAddr> {
    let normalized = if let Some(port) = listen.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        listen.to_string()
    };
    normalized
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid --listen address {listen:?}: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        tracing::error!(%err, "umareld exiting");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(args: Args) -> anyhow::Result<()> {
    let addr = parse_listen_addr(&args.listen)?;
    let state = build_daemon_state(&args.config).await?;

    cleanup::spawn(state.store.clone(), state.config.results_cleanup, state.config.results_duration);
    let dispatcher_handle = dispatcher::spawn(state.clone());
    let router = http::router(&state, dispatcher_handle);

    tracing::info!(%addr, config = %args.config.display(), "umareld starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("umareld shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to install ctrl-c handler, shutdown signal will never fire");
        std::future::pending::<()>().await;
    }
    tracing::info!("received ctrl-c, draining in-flight requests");
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
