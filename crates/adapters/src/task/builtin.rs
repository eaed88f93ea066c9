// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in in-process tasks (spec §4.2 SUPPLEMENT), each grounded in its
//! `original_source/matrix/tasks/*.py` counterpart. `tasks.chaos` is
//! deliberately absent here; see `mtx-engine::chaos`.

use crate::task::{TaskContext, TaskHandler, TaskInvokeError};
use async_trait::async_trait;
use mtx_core::{kinds, AgentStatus, Event, Rule, Task, TestFailure, WorkloadStatus};

fn infra_err(task: &Task, context: &str, e: impl std::fmt::Display) -> TaskInvokeError {
    TaskInvokeError::Other(format!("{context} for task '{}': {e}", task.name()))
}

/// `tasks.deploy` (`tasks/deploy.py`): deploy the bundle via the cluster
/// handle and announce it on the bus. The rule runner itself marks the
/// rule's lifecycle state `complete` on return (spec §4.4 step 4); this
/// handler's job is only the deploy call.
pub struct Deploy;

#[async_trait]
impl TaskHandler for Deploy {
    async fn invoke(
        &self,
        ctx: &dyn TaskContext,
        _rule: &Rule,
        task: &Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        ctx.cluster().deploy().await.map_err(|e| infra_err(task, "deploy failed", e))?;
        let model_name = ctx.config().model.clone().unwrap_or_else(|| "unnamed".to_string());
        ctx.dispatch(Event::model_new(&model_name));
        Ok(true)
    }
}

/// `tasks.health` (`tasks/health.py`): classify cluster health from unit
/// agent/workload status and write `health.status`.
pub struct Health;

#[async_trait]
impl TaskHandler for Health {
    async fn invoke(
        &self,
        ctx: &dyn TaskContext,
        _rule: &Rule,
        task: &Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        let applications = ctx.cluster().applications().await.map_err(|e| infra_err(task, "listing applications", e))?;
        if applications.is_empty() {
            // No model deployed yet: original `health.py` returns early
            // without writing `health.status` in this case.
            return Ok(true);
        }

        let units = ctx.cluster().units(None).await.map_err(|e| infra_err(task, "listing units", e))?;
        let errored = units
            .iter()
            .any(|u| u.workload_status == WorkloadStatus::Error || u.agent_status == AgentStatus::Error);
        let busy = units.iter().any(|u| {
            !matches!(u.workload_status, WorkloadStatus::Active | WorkloadStatus::Unknown)
                || u.agent_status != AgentStatus::Idle
        });
        let was_healthy = ctx.get_state("health.status").as_deref() == Some("healthy");

        let result = if errored {
            "unhealthy"
        } else if busy && !was_healthy {
            "busy"
        } else {
            "healthy"
        };
        ctx.set_state("health.status", result);

        if result == "unhealthy" {
            let gating = task.arg_bool("gating").unwrap_or(task.gating);
            if gating {
                return Err(TaskInvokeError::TestFailure(TestFailure::new(
                    task.clone(),
                    "Health state was unhealthy",
                )));
            }
        }
        Ok(true)
    }
}

/// `tasks.reset` (`tasks/reset.py`): tear down and redeploy between tests.
pub struct Reset;

#[async_trait]
impl TaskHandler for Reset {
    async fn invoke(
        &self,
        ctx: &dyn TaskContext,
        _rule: &Rule,
        task: &Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        ctx.cluster().destroy().await.map_err(|e| infra_err(task, "destroy during reset", e))?;
        ctx.cluster().deploy().await.map_err(|e| infra_err(task, "redeploy during reset", e))?;
        ctx.dispatch(Event::new("reset", kinds::MODEL_CHANGE, serde_json::json!({ "reset": true })));
        Ok(true)
    }
}

/// `tasks.fail` (`tasks/fail.py`): always fails, used to exercise gating.
pub struct Fail;

#[async_trait]
impl TaskHandler for Fail {
    async fn invoke(
        &self,
        _ctx: &dyn TaskContext,
        _rule: &Rule,
        task: &Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        if task.arg_bool("generic_exception") == Some(true) {
            return Err(TaskInvokeError::Other("deliberate generic exception".to_string()));
        }
        Err(TaskInvokeError::TestFailure(TestFailure::new(task.clone(), "Deliberate Test Failure")))
    }
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
