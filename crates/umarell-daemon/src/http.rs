// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP façade (C13): webhook routes that translate GET requests
//! into notifications on the dispatcher's queue, plus the callback-URL
//! listing routes.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use umarell_core::Notification;
use umarell_engine::CallbackRegistry;

use crate::dispatcher::DispatcherHandle;
use crate::DaemonState;

const DEFAULT_BRANCH: &str = "master";

#[derive(Clone)]
struct HttpState {
    dispatcher: DispatcherHandle,
    registry: Arc<CallbackRegistry>,
}

pub fn router(state: &DaemonState, dispatcher: DispatcherHandle) -> Router {
    let http_state = HttpState {
        dispatcher,
        registry: state.registry.clone(),
    };
    Router::new()
        .route("/{project}/jenkins/git/notifyCommit", get(notify_commit))
        .route("/{project}/delete", get(delete_branch))
        .route("/_/text", get(list_text))
        .route("/_/html", get(list_html))
        .with_state(http_state)
}

async fn notify_commit(
    State(state): State<HttpState>,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let branch = params
        .get("branches")
        .cloned()
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let sha1 = match required_param(&params, "sha1") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    tracing::info!(project = %project, %branch, sha1, "jenkins notification received");
    state
        .dispatcher
        .submit(Notification::push(project.clone(), branch, sha1.to_string()))
        .await;
    scheduled_response(&project)
}

async fn delete_branch(
    State(state): State<HttpState>,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let branch = match required_param(&params, "branches") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    tracing::info!(project = %project, branch, "delete notification received");
    state
        .dispatcher
        .submit(Notification::delete(project.clone(), branch.to_string()))
        .await;
    scheduled_response(&project)
}

async fn list_text(State(state): State<HttpState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_text(state.registry.list()),
    )
        .into_response()
}

async fn list_html(State(state): State<HttpState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        render_html(state.registry.list()),
    )
        .into_response()
}

fn required_param<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, Response> {
    match params.get(key).map(String::as_str) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err((
            StatusCode::BAD_REQUEST,
            format!("missing required query parameter: {key}"),
        )
            .into_response()),
    }
}

fn scheduled_response(project: &str) -> Response {
    (StatusCode::OK, format!("Scheduled this {project} job for ya!")).into_response()
}

fn render_text(mut urls: Vec<String>) -> String {
    urls.sort();
    urls.into_iter().map(|u| format!("{u}\n")).collect()
}

fn render_html(mut urls: Vec<String>) -> String {
    urls.sort();
    urls.into_iter()
        .map(|u| format!("<a href=\"{u}\">{u}</a><br />\n"))
        .collect()
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
