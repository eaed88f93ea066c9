// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chaos planner glue (spec §4.6): generate / validate / persist / execute
//! a [`ChaosPlan`] against a [`ClusterModel`], wired through
//! `mtx-adapters`'s selector and action registries.
//!
//! `tasks.chaos` is registered here rather than in `mtx-adapters` because it
//! needs both the selector/action registries (`mtx-adapters`) and a
//! `TaskContext` implementation (`mtx-engine::Context`) — see
//! `register_chaos_task`.

use async_trait::async_trait;
use mtx_adapters::chaos::{ActionRegistry, ResolvedArg, ResolvedKwArgs, SelectorRegistry};
use mtx_adapters::task::{TaskContext, TaskHandler, TaskInvokeError};
use mtx_core::{
    ChaosPlan, ClusterModel, ClusterObject, Event, InvalidPlan, PlannedAction, Rule, SelectorDescriptor, Task,
    TestFailure,
};
use rand::seq::SliceRandom;
use std::path::Path;
use std::time::Duration;

/// `(action object-type, fetch-fn)` pairs for implicit-selector generation
/// (spec §4.6 "Generation"): one entry per cluster-object shape a built-in
/// action operates on.
async fn candidates_for(model: &dyn ClusterModel, object_type: &str) -> Result<usize, mtx_core::InfraFailure> {
    Ok(match object_type {
        "machine" => model.machines().await?.len(),
        "unit" => model.units(None).await?.len(),
        "application" => model.applications().await?.len(),
        _ => 0,
    })
}

/// Build the implicit selector chain for one generated slot (spec §4.6):
/// machine -> `[machines, one]`; unit -> `[units(application=a), leader(value=isLeader), one]`;
/// application -> `[applications, one]`.
async fn implicit_selectors(
    model: &dyn ClusterModel,
    object_type: &str,
) -> Result<Vec<SelectorDescriptor>, mtx_core::InfraFailure> {
    Ok(match object_type {
        "machine" => vec![SelectorDescriptor::new("machines"), SelectorDescriptor::new("one")],
        "unit" => {
            let units = model.units(None).await?;
            let chosen = units.choose(&mut rand::thread_rng());
            let mut units_selector = SelectorDescriptor::new("units");
            if let Some(unit) = chosen {
                let application = model
                    .applications()
                    .await?
                    .into_iter()
                    .find(|a| a.id == unit.application)
                    .map(|a| a.name)
                    .unwrap_or_default();
                units_selector = units_selector.with_kwarg("application", serde_json::json!(application));
                vec![
                    units_selector,
                    SelectorDescriptor::new("leader").with_kwarg("value", serde_json::json!(unit.is_leader)),
                    SelectorDescriptor::new("one"),
                ]
            } else {
                vec![units_selector, SelectorDescriptor::new("one")]
            }
        }
        "application" => vec![SelectorDescriptor::new("applications"), SelectorDescriptor::new("one")],
        _ => Vec::new(),
    })
}

/// Generate a plan of `num` random `(action, object-type)` slots against the
/// current state of `model` (spec §4.6 "Generation"). Always returns
/// `len(actions) == num` as long as the cluster has at least one object of
/// some type the action registry names; a cluster with no objects of any
/// kind cannot seed any slot and returns [`InvalidModel`](mtx_core::InvalidModel).
pub async fn generate_plan(
    model: &dyn ClusterModel,
    actions: &ActionRegistry,
    num: u32,
) -> Result<ChaosPlan, mtx_core::InvalidModel> {
    let names: Vec<String> = actions.names().map(str::to_string).collect();
    if names.is_empty() {
        return Err(mtx_core::InvalidModel::NoUnits);
    }

    let mut usable = Vec::new();
    for name in &names {
        let object_type = actions.get(name).map(|d| d.object_type).unwrap_or_default();
        let count = candidates_for(model, object_type).await.unwrap_or(0);
        if count > 0 {
            usable.push(name.clone());
        }
    }
    if usable.is_empty() {
        return Err(mtx_core::InvalidModel::NoUnits);
    }

    let mut planned = Vec::with_capacity(num as usize);
    for _ in 0..num {
        let name = usable.choose(&mut rand::thread_rng()).cloned().unwrap_or_else(|| usable[0].clone());
        let object_type = actions.get(&name).map(|d| d.object_type).unwrap_or_default();
        let selectors = implicit_selectors(model, object_type).await.unwrap_or_default();
        planned.push(PlannedAction::new(name).with_selectors(selectors));
    }
    Ok(ChaosPlan::new(planned))
}

/// Structural validation (spec §4.6 "Validation"): `actions` present, each
/// with an `action` name. Operates on the raw YAML so a plan missing the
/// `actions` key is reported as [`InvalidPlan::MissingActions`] rather than
/// a generic deserialize error.
pub fn validate_plan_yaml(raw: &serde_yaml::Value) -> Result<(), InvalidPlan> {
    let actions = raw.get("actions").ok_or(InvalidPlan::MissingActions)?;
    let seq = actions.as_sequence().ok_or(InvalidPlan::MissingActions)?;
    for (index, entry) in seq.iter().enumerate() {
        if entry.get("action").and_then(|v| v.as_str()).is_none() {
            return Err(InvalidPlan::MissingActionName(index));
        }
    }
    Ok(())
}

/// Validate that every action/selector name in `plan` is registered (an
/// extension of spec §4.6 validation needed before execution can proceed).
pub fn validate_plan_registries(
    plan: &ChaosPlan,
    selectors: &SelectorRegistry,
    actions: &ActionRegistry,
) -> Result<(), InvalidPlan> {
    for planned in &plan.actions {
        if actions.get(&planned.action).is_none() {
            return Err(InvalidPlan::UnknownAction(planned.action.clone()));
        }
        for descriptor in &planned.selectors {
            if selectors.get(&descriptor.selector).is_none() {
                return Err(InvalidPlan::UnknownSelector(descriptor.selector.clone()));
            }
        }
    }
    Ok(())
}

/// Parse and structurally validate a plan loaded from YAML text.
pub fn load_plan(yaml: &str) -> Result<ChaosPlan, InvalidPlan> {
    let raw: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|_| InvalidPlan::MissingActions)?;
    validate_plan_yaml(&raw)?;
    serde_yaml::from_value(raw).map_err(|_| InvalidPlan::MissingActions)
}

/// Serialize and write a plan to `path` (spec §4.6 "Persistence").
pub fn persist_plan(plan: &ChaosPlan, path: &Path) -> std::io::Result<()> {
    let yaml = serde_yaml::to_string(plan).map_err(std::io::Error::other)?;
    std::fs::write(path, yaml)
}

async fn resolve_kwargs(
    model: &dyn ClusterModel,
    raw: &std::collections::HashMap<String, serde_json::Value>,
) -> Result<ResolvedKwArgs, mtx_core::InfraFailure> {
    let mut resolved = ResolvedKwArgs::new();
    for (key, value) in raw {
        if key == "application" {
            if let Some(name) = value.as_str() {
                let application = model.resolve_application(name).await?;
                resolved.insert(key.clone(), ResolvedArg::Application(application));
                continue;
            }
        }
        resolved.insert(key.clone(), ResolvedArg::Json(value.clone()));
    }
    Ok(resolved)
}

const ACTION_TIMEOUT: Duration = Duration::from_secs(30);
const ACTIVATE_SLEEP: Duration = Duration::from_secs(2);

/// Execute every planned action in `plan` against `model` (spec §4.6
/// "Execution"): walk each action's selector chain, invoke it under a
/// 30-second timeout, publish `chaos.activate`, sleep 2 seconds, then block
/// until the cluster reports all units idle.
pub async fn execute_plan<Ctx: TaskContext + ?Sized>(
    ctx: &Ctx,
    rule: &Rule,
    plan: &ChaosPlan,
    selectors: &SelectorRegistry,
    actions: &ActionRegistry,
) -> Result<(), TestFailure> {
    let model = ctx.cluster();

    for planned in &plan.actions {
        let Some(descriptor) = actions.get(&planned.action) else {
            tracing::warn!(action = %planned.action, "skipping unknown chaos action");
            continue;
        };

        let mut objects: Vec<ClusterObject> = Vec::new();
        let mut short_circuited = false;
        for selector_descriptor in &planned.selectors {
            let Some(selector) = selectors.get(&selector_descriptor.selector) else {
                tracing::warn!(selector = %selector_descriptor.selector, "skipping unknown selector");
                short_circuited = true;
                break;
            };
            let resolved_kwargs = match resolve_kwargs(model, &selector_descriptor.kwargs).await {
                Ok(kwargs) => kwargs,
                Err(e) => {
                    tracing::warn!(error = %e, "failed resolving selector kwargs");
                    short_circuited = true;
                    break;
                }
            };
            objects = match selector.select(model, &objects, &resolved_kwargs).await {
                Ok(objects) => objects,
                Err(e) => {
                    tracing::warn!(error = %e, "selector invocation failed");
                    short_circuited = true;
                    break;
                }
            };
            if objects.is_empty() {
                short_circuited = true;
                break;
            }
        }

        if short_circuited || objects.is_empty() {
            tracing::debug!(action = %planned.action, "no objects found for selector chain; action skipped");
            continue;
        }

        let action = descriptor.action.clone();
        let kwargs = planned.extra_args.clone();
        let objects_for_action = objects.clone();
        let run = async move {
            for object in &objects_for_action {
                action.apply(model, object, &kwargs).await?;
            }
            Ok::<(), mtx_core::InfraFailure>(())
        };

        let errored = match tokio::time::timeout(ACTION_TIMEOUT, run).await {
            Ok(Ok(())) => false,
            Ok(Err(e)) => {
                tracing::warn!(action = %planned.action, error = %e, "chaos action failed");
                true
            }
            Err(_elapsed) => {
                tracing::warn!(action = %planned.action, "chaos action timed out after 30s");
                true
            }
        };

        if errored && ctx.config().should_gate(&rule.task) {
            return Err(TestFailure::new(rule.task.clone(), "one or more chaos actions failed"));
        }

        ctx.dispatch(Event::chaos_activate(&planned.action, serde_json::to_value(&planned.extra_args).unwrap_or_default()));
        tokio::time::sleep(ACTIVATE_SLEEP).await;
    }

    while !model.all_units_idle().await.unwrap_or(true) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    Ok(())
}

/// `tasks.chaos` (spec §4.6 entry point): resolves a plan (from
/// `task.args.plan`, `config.chaos_plan`, or freshly generated and
/// persisted), validates it against the registries, and executes it.
pub struct ChaosTask {
    pub selectors: SelectorRegistry,
    pub actions: ActionRegistry,
}

#[async_trait]
impl TaskHandler for ChaosTask {
    async fn invoke(
        &self,
        ctx: &dyn TaskContext,
        rule: &Rule,
        task: &Task,
        _event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError> {
        let plan = if let Some(path) = task.arg_str("plan").map(std::path::PathBuf::from).or_else(|| ctx.config().chaos_plan.clone())
        {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| TaskInvokeError::Other(format!("reading chaos plan {}: {e}", path.display())))?;
            load_plan(&text).map_err(|e| TaskInvokeError::Other(e.to_string()))?
        } else {
            let plan = generate_plan(ctx.cluster(), &self.actions, ctx.config().chaos_num)
                .await
                .map_err(|e| TaskInvokeError::Other(e.to_string()))?;
            if let Some(output_dir) = &ctx.config().output_dir {
                let model_name = ctx.config().model.clone().unwrap_or_else(|| "unnamed".to_string());
                let filename = ctx.config().chaos_output.replace("{model}", &model_name);
                let path = output_dir.join(filename);
                if let Err(e) = persist_plan(&plan, &path) {
                    tracing::warn!(error = %e, "failed persisting generated chaos plan");
                }
            }
            plan
        };

        validate_plan_registries(&plan, &self.selectors, &self.actions)
            .map_err(|e| TaskInvokeError::Other(e.to_string()))?;

        execute_plan(ctx, rule, &plan, &self.selectors, &self.actions)
            .await
            .map_err(TaskInvokeError::TestFailure)?;

        Ok(true)
    }
}

/// Wire `tasks.chaos` into `registry`, closing over the selector/action
/// registries `mtx-adapters` builds (spec §4.6, §2 table: this crate
/// assembles H into G).
pub fn register_chaos_task(
    registry: &mut mtx_adapters::TaskRegistry,
    selectors: SelectorRegistry,
    actions: ActionRegistry,
) {
    registry.register("tasks.chaos", std::sync::Arc::new(ChaosTask { selectors, actions }));
}

#[cfg(test)]
#[path = "chaos_tests.rs"]
mod tests;
