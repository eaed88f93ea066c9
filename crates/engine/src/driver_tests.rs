// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use mtx_adapters::task::{TaskHandler, TaskInvokeError};
use mtx_adapters::{FakeClusterModel, TaskRegistry};
use mtx_core::{Condition, ConditionMode, Config, FakeClock, Rule, Suite, Task};
use std::time::Duration;

fn new_ctx(cluster: FakeClusterModel, registry: TaskRegistry) -> (Arc<Context<FakeClock>>, Arc<Bus<FakeClock>>) {
    let clock = FakeClock::new();
    let bus = Arc::new(Bus::new(clock, false));
    let cluster: Arc<dyn mtx_core::ClusterModel> = Arc::new(cluster);
    let config = Config { interval: Duration::from_millis(5), ..Config::default() };
    let ctx = Context::new(bus.clone(), cluster, config, Suite::default(), registry);
    (ctx, bus)
}

struct SetStateHandler {
    name: &'static str,
    value: &'static str,
}

#[async_trait]
impl TaskHandler for SetStateHandler {
    async fn invoke(
        &self,
        ctx: &dyn TaskContext,
        _rule: &Rule,
        _task: &Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        ctx.set_state(self.name, self.value);
        Ok(true)
    }
}

#[tokio::test]
async fn sequential_gating_scenario_runs_deploy_then_health_to_success() {
    let (ctx, bus) = new_ctx(FakeClusterModel::empty().with_application("etcd", 1), TaskRegistry::new());
    let bus_task = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(false).await }
    });

    let deploy = Rule::new("deploy", Task::new("tasks.deploy"));
    let health = Rule::new("health", Task::new("tasks.health"))
        .with_conditions(vec![Condition::new(ConditionMode::After, "deploy")]);
    let test = mtx_core::Test::new("smoke").with_rules(vec![deploy, health]);

    let outcome = run_test(&ctx, &test).await;

    assert!(outcome.success);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(ctx.get_state("deploy").as_deref(), Some("complete"));
    let health_status = ctx.get_state("health.status");
    assert!(matches!(health_status.as_deref(), Some("healthy") | Some("busy") | Some("unhealthy")));

    bus.shutdown();
    let _ = bus_task.await;
}

#[tokio::test]
async fn gating_failure_yields_exit_101_and_non_gating_yields_exit_0() {
    let (ctx, _bus) = new_ctx(FakeClusterModel::empty(), TaskRegistry::new());
    let mut gating_task = Task::new("tasks.fail");
    gating_task.gating = true;
    let test = mtx_core::Test::new("gating").with_rules(vec![Rule::new("fail", gating_task)]);

    let outcome = run_test(&ctx, &test).await;
    assert_eq!(outcome.exit_code, 101);
    assert!(!outcome.success);

    let (ctx2, _bus2) = new_ctx(FakeClusterModel::empty(), TaskRegistry::new());
    let mut non_gating_task = Task::new("tasks.fail");
    non_gating_task.gating = false;
    let test2 = mtx_core::Test::new("non-gating").with_rules(vec![Rule::new("fail", non_gating_task)]);

    let outcome2 = run_test(&ctx2, &test2).await;
    assert_eq!(outcome2.exit_code, 0);
    assert!(outcome2.success);
}

#[tokio::test]
async fn until_condition_cancels_traffic_rule_once_chaos_completes() {
    let mut registry = TaskRegistry::new();
    registry.register("tasks.chaos_done", Arc::new(SetStateHandler { name: "chaos", value: "complete" }));
    let (ctx, bus) = new_ctx(FakeClusterModel::empty(), registry);
    let bus_task = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(false).await }
    });

    ctx.set_state("deploy", "complete");

    let traffic = Rule::new("traffic", Task::new("tasks.health")).with_conditions(vec![
        Condition::new(ConditionMode::While, "deploy.complete"),
        Condition::new(ConditionMode::Until, "chaos.complete"),
    ]);
    let chaos = Rule::new("chaos", Task::new("tasks.chaos_done"));
    let test = mtx_core::Test::new("until-cancels").with_rules(vec![traffic, chaos]);

    let outcome = tokio::time::timeout(Duration::from_secs(5), run_test(&ctx, &test)).await.unwrap();
    assert!(outcome.success);
    assert_eq!(ctx.get_state("traffic").as_deref(), Some("complete"));

    bus.shutdown();
    let _ = bus_task.await;
}
