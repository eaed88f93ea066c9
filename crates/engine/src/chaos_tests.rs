// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mtx_adapters::test_support::FakeTaskContext;
use mtx_adapters::FakeClusterModel;
use mtx_core::Task;

#[tokio::test]
async fn generate_plan_produces_the_requested_number_of_actions() {
    let model = FakeClusterModel::empty().with_application("etcd", 3);
    let actions = ActionRegistry::new();

    let plan = generate_plan(&model, &actions, 4).await.unwrap();

    assert_eq!(plan.actions.len(), 4);
    for action in &plan.actions {
        assert!(actions.get(&action.action).is_some());
        assert!(!action.selectors.is_empty());
    }
}

#[tokio::test]
async fn generate_plan_on_an_empty_cluster_is_invalid_model() {
    let model = FakeClusterModel::empty();
    let actions = ActionRegistry::new();

    let err = generate_plan(&model, &actions, 3).await.unwrap_err();
    assert!(matches!(err, mtx_core::InvalidModel::NoUnits));
}

#[test]
fn validate_plan_yaml_rejects_a_plan_missing_the_actions_key() {
    let raw: serde_yaml::Value = serde_yaml::from_str("foo: bar").unwrap();
    assert!(matches!(validate_plan_yaml(&raw), Err(InvalidPlan::MissingActions)));
}

#[test]
fn validate_plan_yaml_rejects_an_action_missing_its_name() {
    let raw: serde_yaml::Value = serde_yaml::from_str("actions:\n  - selectors: []\n").unwrap();
    assert!(matches!(validate_plan_yaml(&raw), Err(InvalidPlan::MissingActionName(0))));
}

#[test]
fn validate_plan_registries_rejects_unknown_action_and_selector() {
    let selectors = SelectorRegistry::new();
    let actions = ActionRegistry::new();

    let unknown_action = ChaosPlan::new(vec![PlannedAction::new("nonexistent")]);
    assert!(matches!(
        validate_plan_registries(&unknown_action, &selectors, &actions),
        Err(InvalidPlan::UnknownAction(_))
    ));

    let unknown_selector =
        ChaosPlan::new(vec![PlannedAction::new("reboot").with_selectors(vec![SelectorDescriptor::new("nope")])]);
    assert!(matches!(
        validate_plan_registries(&unknown_selector, &selectors, &actions),
        Err(InvalidPlan::UnknownSelector(_))
    ));
}

#[test]
fn persist_and_load_plan_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.yaml");
    let plan = ChaosPlan::new(vec![PlannedAction::new("reboot").with_selectors(vec![
        SelectorDescriptor::new("units"),
        SelectorDescriptor::new("one"),
    ])]);

    persist_plan(&plan, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let loaded = load_plan(&text).unwrap();

    assert_eq!(loaded, plan);
}

fn rule_with_task(task: Task) -> Rule {
    Rule::new("chaos", task)
}

#[tokio::test(start_paused = true)]
async fn execute_plan_applies_the_action_and_dispatches_chaos_activate() {
    let cluster = FakeClusterModel::empty().with_application("etcd", 2);
    let ctx = FakeTaskContext::new().with_cluster(cluster);
    let selectors = SelectorRegistry::new();
    let actions = ActionRegistry::new();
    let plan = ChaosPlan::new(vec![
        PlannedAction::new("kill_agent").with_selectors(vec![SelectorDescriptor::new("units"), SelectorDescriptor::new("one")]),
    ]);
    let rule = rule_with_task(Task::new("tasks.chaos"));

    execute_plan(&ctx, &rule, &plan, &selectors, &actions).await.unwrap();

    let activations: Vec<_> = ctx.dispatched().into_iter().filter(|e| e.kind_is(mtx_core::kinds::CHAOS_ACTIVATE)).collect();
    assert_eq!(activations.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn execute_plan_skips_an_action_whose_selector_chain_yields_nothing() {
    let ctx = FakeTaskContext::new();
    let selectors = SelectorRegistry::new();
    let actions = ActionRegistry::new();
    let plan = ChaosPlan::new(vec![
        PlannedAction::new("reboot").with_selectors(vec![SelectorDescriptor::new("units"), SelectorDescriptor::new("one")]),
    ]);
    let rule = rule_with_task(Task::new("tasks.chaos"));

    execute_plan(&ctx, &rule, &plan, &selectors, &actions).await.unwrap();

    assert!(ctx.dispatched().is_empty());
}

#[tokio::test(start_paused = true)]
async fn execute_plan_stops_on_a_gating_failure_before_dispatching_or_running_later_actions() {
    let cluster = FakeClusterModel::empty().with_application("etcd", 2);
    let ctx = FakeTaskContext::new().with_cluster(cluster);
    let selectors = SelectorRegistry::new();
    let actions = ActionRegistry::new();
    // `add_unit` expects an Application object; selecting a unit makes the
    // action fail with a type mismatch, simulating an errored chaos action.
    let plan = ChaosPlan::new(vec![
        PlannedAction::new("add_unit").with_selectors(vec![SelectorDescriptor::new("units"), SelectorDescriptor::new("one")]),
        PlannedAction::new("kill_agent").with_selectors(vec![SelectorDescriptor::new("units"), SelectorDescriptor::new("one")]),
    ]);
    let rule = rule_with_task(Task::new("tasks.chaos"));

    let err = execute_plan(&ctx, &rule, &plan, &selectors, &actions).await.unwrap_err();
    assert_eq!(err.task, rule.task);

    // No chaos.activate for the failed action, and the second (otherwise
    // valid) action in the plan never ran either.
    assert!(ctx.dispatched().is_empty());
}

#[tokio::test(start_paused = true)]
async fn chaos_task_generates_and_executes_a_plan_when_none_is_configured() {
    let cluster = FakeClusterModel::empty().with_application("etcd", 2);
    let ctx = FakeTaskContext::new().with_cluster(cluster);
    let chaos_task = ChaosTask { selectors: SelectorRegistry::new(), actions: ActionRegistry::new() };
    let rule = rule_with_task(Task::new("tasks.chaos"));

    let result = chaos_task.invoke(&ctx, &rule, &rule.task, None).await.unwrap();

    assert!(result);
}
