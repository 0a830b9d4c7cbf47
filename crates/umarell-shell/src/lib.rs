// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-command process execution with a wall-clock timeout.
//!
//! Commands here are already-tokenized argv arrays coming out of config
//! templates, not shell source to parse — there is no lexer/parser in
//! this crate, just spawn-capture-timeout.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command {command:?} is empty")]
    EmptyCommand { command: Vec<String> },
    #[error("failed to spawn {command:?}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait on {command:?}: {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// The outcome of running one command to completion or timeout.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Run `argv[0] argv[1..]` in `cwd`, capturing stdout/stderr, killing the
/// process if it runs longer than `timeout`.
///
/// The waiter future is always driven to completion by this function
/// (either naturally or via the timeout branch's explicit kill-then-wait),
/// so no child process or task is ever leaked on the timeout path.
pub async fn run_with_timeout(
    argv: &[String],
    cwd: &Path,
    timeout: Duration,
) -> Result<ExecOutput, ExecError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ExecError::EmptyCommand { command: argv.to_vec() });
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .kill_on_drop(true)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = command.spawn().map_err(|source| ExecError::SpawnFailed {
        command: program.clone(),
        source,
    })?;

    // `wait_with_output` drains both pipes concurrently, so a chatty
    // stderr can't block a stalled stdout (or vice versa). Dropping this
    // future on timeout drops the `Child` with it; `kill_on_drop` then
    // sends the kill signal without us needing a detached waiter task.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            timed_out: false,
        }),
        Ok(Err(source)) => Err(ExecError::WaitFailed {
            command: program.clone(),
            source,
        }),
        Err(_elapsed) => {
            tracing::warn!(command = %program, ?timeout, "command timed out, killing");
            Ok(ExecOutput {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: None,
                timed_out: true,
            })
        }
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
