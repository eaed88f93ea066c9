// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::FakeTaskContext;
use mtx_core::{AgentStatus, WorkloadStatus};

fn rule_with(task: Task) -> Rule {
    Rule::new("r", task)
}

#[tokio::test]
async fn deploy_calls_cluster_and_announces_model() {
    let ctx = FakeTaskContext::new();
    let task = Task::new("tasks.deploy");
    let rule = rule_with(task.clone());

    let ok = Deploy.invoke(&ctx, &rule, &task, None).await.unwrap();
    assert!(ok);
    assert!(ctx.dispatched().iter().any(|e| e.kind_is(mtx_core::kinds::MODEL_NEW)));
}

#[tokio::test]
async fn health_skips_when_no_applications_deployed() {
    let ctx = FakeTaskContext::new();
    let task = Task::new("tasks.health");
    let rule = rule_with(task.clone());

    Health.invoke(&ctx, &rule, &task, None).await.unwrap();
    assert_eq!(ctx.get_state("health.status"), None);
}

#[tokio::test]
async fn health_reports_unhealthy_and_gates_by_default() {
    let fake = crate::cluster::fake::FakeClusterModel::empty().with_application("etcd", 1);
    let units = fake.units(None).await.unwrap();
    fake.set_unit_status(&units[0].id, AgentStatus::Error, WorkloadStatus::Error);
    let ctx = FakeTaskContext::new().with_cluster(fake);
    let task = Task::new("tasks.health");
    let rule = rule_with(task.clone());

    let err = Health.invoke(&ctx, &rule, &task, None).await.unwrap_err();
    assert!(matches!(err, TaskInvokeError::TestFailure(_)));
    assert_eq!(ctx.get_state("health.status").as_deref(), Some("unhealthy"));
}

#[tokio::test]
async fn health_unhealthy_does_not_fail_when_gating_disabled() {
    let fake = crate::cluster::fake::FakeClusterModel::empty().with_application("etcd", 1);
    let units = fake.units(None).await.unwrap();
    fake.set_unit_status(&units[0].id, AgentStatus::Error, WorkloadStatus::Error);
    let ctx = FakeTaskContext::new().with_cluster(fake);
    let mut task = Task::new("tasks.health");
    task.gating = false;
    let rule = rule_with(task.clone());

    let ok = Health.invoke(&ctx, &rule, &task, None).await.unwrap();
    assert!(ok);
}

#[tokio::test]
async fn health_reports_busy_when_not_previously_healthy() {
    let fake = crate::cluster::fake::FakeClusterModel::empty().with_application("etcd", 1);
    let units = fake.units(None).await.unwrap();
    fake.set_unit_status(&units[0].id, AgentStatus::Executing, WorkloadStatus::Waiting);
    let ctx = FakeTaskContext::new().with_cluster(fake);
    let task = Task::new("tasks.health");
    let rule = rule_with(task.clone());

    Health.invoke(&ctx, &rule, &task, None).await.unwrap();
    assert_eq!(ctx.get_state("health.status").as_deref(), Some("busy"));
}

#[tokio::test]
async fn reset_destroys_then_redeploys_and_announces_change() {
    let ctx = FakeTaskContext::new().with_cluster(crate::cluster::fake::FakeClusterModel::empty().with_application("etcd", 1));
    let task = Task::new("tasks.reset");
    let rule = rule_with(task.clone());

    let ok = Reset.invoke(&ctx, &rule, &task, None).await.unwrap();
    assert!(ok);
    assert!(ctx.dispatched().iter().any(|e| e.kind_is(mtx_core::kinds::MODEL_CHANGE)));
}

#[tokio::test]
async fn fail_always_returns_test_failure() {
    let ctx = FakeTaskContext::new();
    let task = Task::new("tasks.fail");
    let rule = rule_with(task.clone());

    let err = Fail.invoke(&ctx, &rule, &task, None).await.unwrap_err();
    assert!(matches!(err, TaskInvokeError::TestFailure(_)));
}

#[tokio::test]
async fn fail_raises_generic_exception_when_asked() {
    let ctx = FakeTaskContext::new();
    let mut task = Task::new("tasks.fail");
    task.args.insert("generic_exception".to_string(), serde_json::Value::Bool(true));
    let rule = rule_with(task.clone());

    let err = Fail.invoke(&ctx, &rule, &task, None).await.unwrap_err();
    assert!(matches!(err, TaskInvokeError::Other(_)));
}
