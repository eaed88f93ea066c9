// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mtx_adapters::task::{TaskHandler, TaskInvokeError};
use mtx_adapters::{FakeClusterModel, TaskRegistry};
use mtx_core::{kinds, Condition, ConditionMode, Config, FakeClock, Suite, Task, TestFailure};
use std::sync::atomic::{AtomicUsize, Ordering};

fn new_ctx(registry: TaskRegistry) -> (Arc<Context<FakeClock>>, Arc<Bus<FakeClock>>) {
    let clock = FakeClock::new();
    let bus = Arc::new(Bus::new(clock, false));
    let cluster: Arc<dyn mtx_core::ClusterModel> = Arc::new(FakeClusterModel::empty());
    let config = Config { interval: Duration::from_millis(5), ..Config::default() };
    let ctx = Context::new(bus.clone(), cluster, config, Suite::default(), registry);
    (ctx, bus)
}

struct CountingHandler(Arc<AtomicUsize>);

#[async_trait]
impl TaskHandler for CountingHandler {
    async fn invoke(
        &self,
        _ctx: &dyn TaskContext,
        _rule: &Rule,
        _task: &mtx_core::Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[tokio::test]
async fn unconditional_rule_enters_runs_and_completes() {
    let (ctx, bus) = new_ctx(TaskRegistry::new());
    let rule = Rule::new("deploy", Task::new("tasks.deploy"));

    let result = run_rule(ctx.clone(), rule.clone(), CancellationToken::new()).await;
    assert!(matches!(result, RuleResult::Completed(true)));
    assert_eq!(ctx.get_state("deploy").as_deref(), Some("complete"));

    bus.notify(true).await;
    let done_events: Vec<_> = ctx.timeline().into_iter().filter(|e| e.kind_is(kinds::RULE_DONE)).collect();
    assert_eq!(done_events.len(), 1);
}

#[tokio::test]
async fn cancelling_a_rule_that_never_entered_still_publishes_rule_done_without_running_the_task() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut registry = TaskRegistry::new();
    registry.register("tasks.never", Arc::new(CountingHandler(counter.clone())));
    let (ctx, _bus) = new_ctx(registry);

    let rule = Rule::new("traffic", Task::new("tasks.never"))
        .with_conditions(vec![Condition::new(ConditionMode::Until, "chaos.complete")]);

    let token = CancellationToken::new();
    let handle = tokio::spawn(run_rule(ctx.clone(), rule, token.clone()));
    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let result = handle.await.unwrap();
    assert!(matches!(result, RuleResult::Completed(true)));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn gating_task_failure_is_reported_as_gated() {
    let (ctx, _bus) = new_ctx(TaskRegistry::new());
    let rule = Rule::new("fail", Task::new("tasks.fail"));

    let result = run_rule(ctx, rule, CancellationToken::new()).await;
    match result {
        RuleResult::Gated(TestFailure { message, .. }) => assert_eq!(message, "Deliberate Test Failure"),
        other => panic!("expected Gated, got {other:?}"),
    }
}

#[tokio::test]
async fn non_test_failure_exception_is_reported_as_errored() {
    let (ctx, _bus) = new_ctx(TaskRegistry::new());
    let mut task = Task::new("tasks.fail");
    task.args.insert("generic_exception".to_string(), serde_json::json!(true));
    let rule = Rule::new("fail", task);

    let result = run_rule(ctx, rule, CancellationToken::new()).await;
    assert!(matches!(result, RuleResult::Errored(_)));
}

#[tokio::test]
async fn on_event_rule_invokes_handler_once_per_matching_event_then_stops_after_cancellation() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut registry = TaskRegistry::new();
    registry.register("tasks.on_chaos", Arc::new(CountingHandler(counter.clone())));
    let (ctx, bus) = new_ctx(registry);

    let rule = Rule::new("watcher", Task::new("tasks.on_chaos")).with_conditions(vec![
        Condition::new(ConditionMode::On, "chaos.activate"),
        Condition::new(ConditionMode::Until, "chaos.complete"),
    ]);

    let token = CancellationToken::new();
    ctx.register_waiter("chaos.complete", token.clone(), "watcher");
    let handle = tokio::spawn(run_rule(ctx.clone(), rule, token));

    let bus_task = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(false).await }
    });

    // give the runner time to subscribe before firing events
    tokio::time::sleep(Duration::from_millis(20)).await;
    for _ in 0..3 {
        ctx.dispatch(Event::new("test", "chaos.activate", serde_json::json!({})));
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    ctx.set_state("chaos", "complete");
    let result = handle.await.unwrap();
    assert!(matches!(result, RuleResult::Completed(true)));

    // a fourth event after cancellation must not invoke the handler again
    ctx.dispatch(Event::new("test", "chaos.activate", serde_json::json!({})));
    tokio::time::sleep(Duration::from_millis(20)).await;

    bus.shutdown();
    let _ = bus_task.await;
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}
