// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed result store. All `rusqlite` calls run on the blocking
//! thread pool so the async build actor never stalls the runtime on
//! file I/O.

use crate::{ResultStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;
use umarell_core::{BuildAct, BuildResult};

#[derive(Clone)]
pub struct SqliteStore {
    path: Arc<PathBuf>,
    table: Arc<str>,
}

impl SqliteStore {
    /// Open (creating if absent) the sqlite database at `path`, using
    /// `table` (default `builds`) for the result rows.
    pub fn open(path: impl Into<PathBuf>, table: Option<&str>) -> Result<Self, StoreError> {
        let path = path.into();
        let table: Arc<str> = table.unwrap_or("builds").into();
        let conn = Connection::open(&path)?;
        create_table(&conn, &table)?;
        Ok(Self {
            path: Arc::new(path),
            table,
        })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&*self.path)?)
    }
}

fn create_table(conn: &Connection, table: &str) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start TEXT NOT NULL,
            end TEXT NOT NULL,
            act INTEGER NOT NULL,
            ticket INTEGER,
            exitcode INTEGER,
            sha1 CHAR(40) NOT NULL,
            stage VARCHAR NOT NULL,
            cmd TEXT NOT NULL,
            branch TEXT NOT NULL,
            stdout TEXT NOT NULL,
            stderr TEXT NOT NULL
        )"
    ))?;
    Ok(())
}

fn act_to_int(act: BuildAct) -> i64 {
    match act {
        BuildAct::Create => 0,
        BuildAct::Change => 1,
        BuildAct::Update => 2,
        BuildAct::Destroy => 3,
    }
}

fn act_from_int(v: i64) -> BuildAct {
    match v {
        0 => BuildAct::Create,
        1 => BuildAct::Change,
        3 => BuildAct::Destroy,
        _ => BuildAct::Update,
    }
}

#[async_trait]
impl ResultStore for SqliteStore {
    async fn add(&self, result: BuildResult) -> Result<(), StoreError> {
        let table = self.table.clone();
        let store = self.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let conn = store.connect()?;
            let cmd = serde_json::to_string(&result.cmd)?;
            conn.execute(
                &format!(
                    "INSERT INTO {table} (start, end, act, ticket, exitcode, sha1, stage, cmd, branch, stdout, stderr)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                rusqlite::params![
                    result.start.to_rfc3339(),
                    result.end.to_rfc3339(),
                    act_to_int(result.act),
                    result.ticket.map(|t| t as i64),
                    result.exit_code,
                    result.sha1,
                    result.stage.as_str(),
                    cmd,
                    result.branch,
                    result.stdout,
                    result.stderr,
                ],
            )?;
            Ok(())
        })
        .await??;
        Ok(())
    }

    async fn get(&self, stage: &str) -> Result<Vec<BuildResult>, StoreError> {
        let table = self.table.clone();
        let stage = stage.to_string();
        let store = self.clone();
        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<BuildResult>, StoreError> {
            let conn = store.connect()?;
            let mut stmt = conn.prepare(&format!(
                "SELECT start, end, act, ticket, exitcode, sha1, stage, cmd, branch, stdout, stderr
                 FROM {table} WHERE stage = ?1"
            ))?;
            let results = stmt
                .query_map([&stage], row_to_result)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(results)
        })
        .await??;
        Ok(rows)
    }

    async fn delete(&self, stage: &str) -> Result<(), StoreError> {
        let table = self.table.clone();
        let stage = stage.to_string();
        let store = self.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let conn = store.connect()?;
            conn.execute(&format!("DELETE FROM {table} WHERE stage = ?1"), [&stage])?;
            Ok(())
        })
        .await??;
        Ok(())
    }

    async fn clean(&self, before: DateTime<Utc>) -> Result<u64, StoreError> {
        let table = self.table.clone();
        let store = self.clone();
        let removed = tokio::task::spawn_blocking(move || -> Result<u64, StoreError> {
            let conn = store.connect()?;
            let n = conn.execute(
                &format!("DELETE FROM {table} WHERE end < ?1"),
                [before.to_rfc3339()],
            )?;
            Ok(n as u64)
        })
        .await??;
        Ok(removed)
    }
}

fn row_to_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<BuildResult> {
    let cmd_json: String = row.get(7)?;
    let cmd: Vec<String> = serde_json::from_str(&cmd_json).unwrap_or_default();
    let start: String = row.get(0)?;
    let end: String = row.get(1)?;
    Ok(BuildResult {
        start: DateTime::parse_from_rfc3339(&start)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        end: DateTime::parse_from_rfc3339(&end)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        act: act_from_int(row.get(2)?),
        ticket: row.get::<_, Option<i64>>(3)?.map(|t| t as u64),
        exit_code: row.get(4)?,
        sha1: row.get(5)?,
        stage: row.get::<_, String>(6)?.into(),
        cmd,
        branch: row.get(8)?,
        stdout: row.get(9)?,
        stderr: row.get(10)?,
    })
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
