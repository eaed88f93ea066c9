// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invoke-as-process (spec §4.2): the fallback path for a task whose
//! `command` resolved to a filesystem path rather than an in-process
//! handler. The process receives a JSON [`ProcessView`](crate::task::ProcessView)
//! of the run context on stdin and its exit code decides the outcome. The
//! child is spawned with only `PATH` set (prefixed with `config.path`) — no
//! other environment leaks through (spec §4.2/§6).

use crate::task::{ProcessView, TaskContext, TaskInvokeError};
use mtx_core::{Event, Rule, Task, TestFailure};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncWriteExt, AsyncReadExt};
use tokio::process::Command;

/// Spawn `path` with the task's args on argv and a [`ProcessView`] of the
/// context as JSON on stdin; interpret its exit code and stderr.
pub async fn invoke_as_process(
    ctx: &dyn TaskContext,
    _rule: &Rule,
    task: &Task,
    event: Option<&Event>,
    path: &Path,
) -> Result<bool, TaskInvokeError> {
    let view = ProcessView {
        suite: ctx.suite(),
        states: ctx.states(),
        timeline: ctx.timeline(),
        config_path: ctx.config().path.display().to_string(),
        args: &task.args,
        event,
    };
    let stdin_payload = serde_json::to_vec(&view)
        .map_err(|e| TaskInvokeError::Other(format!("serializing process view for '{}': {e}", task.name())))?;

    let path_env = format!("{}:{}", ctx.config().path.display(), std::env::var("PATH").unwrap_or_default());
    let mut child = Command::new(path)
        .env_clear()
        .env("PATH", path_env)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TaskInvokeError::Other(format!("spawning task process '{}': {e}", path.display())))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(&stdin_payload)
            .await
            .map_err(|e| TaskInvokeError::Other(format!("writing to task process stdin: {e}")))?;
    }

    let mut stdout = String::new();
    let mut stderr = String::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_string(&mut stdout).await;
    }
    if let Some(mut err) = child.stderr.take() {
        let _ = err.read_to_string(&mut stderr).await;
    }

    let status = child
        .wait()
        .await
        .map_err(|e| TaskInvokeError::Other(format!("waiting on task process: {e}")))?;

    tracing::debug!(task = task.name(), stdout = %stdout.trim(), "task process output");

    match status.code() {
        Some(0) => Ok(true),
        Some(code) => {
            let message = if stderr.trim().is_empty() {
                format!("task process exited {code}")
            } else {
                stderr.trim().to_string()
            };
            Err(TaskInvokeError::TestFailure(TestFailure::new(task.clone(), message)))
        }
        None => Err(TaskInvokeError::Other(format!("task process '{}' terminated by signal", path.display()))),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
