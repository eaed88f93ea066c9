// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule runner (spec §4.4): the per-rule state machine driving enter / run /
//! exit phases over a rule's conditions.
//!
//! Implemented as a plain async function rather than a hand-rolled poll
//! loop, matching the teacher's per-entity async task pattern. Cancellation
//! is cooperative via a [`CancellationToken`] the test driver registers
//! against every `until` wait-key before spawning the runner (spec §4.5).

use crate::context::Context;
use async_trait::async_trait;
use mtx_adapters::task::{Resolved, TaskContext, TaskInvokeError};
use mtx_adapters::invoke_as_process;
use mtx_bus::{Handler, HandlerError, Predicate};
use mtx_core::{Clock, Condition, ConditionMode, Event, Rule};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of driving one rule to completion (spec §4.4's "Failure
/// semantics"). Always returned, never an `Err`: a runner never panics its
/// own task on an expected outcome, so the test driver can classify every
/// result uniformly.
#[derive(Debug, Clone)]
pub enum RuleResult {
    /// The rule ran to completion (or was cancelled before ever entering);
    /// `bool` is the result `rule.done` carried.
    Completed(bool),
    /// The task raised a gating-relevant `TestFailure` (spec §4.4: "re-raises
    /// to the test driver"). Classification of gating happens in the driver.
    Gated(mtx_core::TestFailure),
    /// Any other task exception (spec §4.4: "logged, the runner returns
    /// `false` without re-raising"); surfaced here so the driver can still
    /// classify it as an infra failure.
    Errored(String),
}

/// Subscriber handler backing a rule's `on` clause (spec §4.2 "Event-driven
/// task"): fires the resolved in-process/subprocess task with the matched
/// event as its fourth argument, fire-and-forget, so the bus drain loop is
/// never blocked on a handler invocation.
struct OnHandler<C: Clock> {
    ctx: Arc<Context<C>>,
    rule: Rule,
}

#[async_trait]
impl<C: Clock> Handler for OnHandler<C> {
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        let ctx = self.ctx.clone();
        let rule = self.rule.clone();
        let event = event.clone();
        tokio::spawn(async move {
            if let Err(e) = invoke_task(&ctx, &rule, Some(&event)).await {
                tracing::warn!(rule = %rule.name, error = %e, "on-event task invocation failed");
            }
        });
        Ok(())
    }
}

/// Predicate gating an `on` subscription to a single rule's running window
/// (spec §4.2: `fnmatch(event.kind, on-statement) && rule.lifecycle ==
/// RUNNING`).
fn lifecycle_running<C: Clock>(ctx: Arc<Context<C>>, rule_name: String) -> Predicate {
    Arc::new(move |_event: &Event| ctx.get_state(&rule_name).as_deref() == Some("running"))
}

async fn invoke_task<C: Clock>(
    ctx: &Arc<Context<C>>,
    rule: &Rule,
    event: Option<&Event>,
) -> Result<bool, TaskInvokeError> {
    let resolved = ctx
        .task_registry()
        .resolve(&rule.task.command, ctx.config())
        .map_err(|e| TaskInvokeError::Other(e.to_string()))?;

    match resolved {
        Resolved::InProcess(handler) => handler.invoke(ctx.as_ref(), rule, &rule.task, event).await,
        Resolved::Process(path) => invoke_as_process(ctx.as_ref(), rule, &rule.task, event, &path).await,
    }
}

fn has_mode(rule: &Rule, mode: ConditionMode) -> bool {
    rule.conditions.iter().any(|c| c.mode == mode)
}

fn periodic_condition(rule: &Rule) -> Option<&Condition> {
    rule.conditions.iter().find(|c| c.mode == ConditionMode::Periodic)
}

/// Drive `rule` through the enter/run/exit algorithm (spec §4.4) until it
/// completes or is cancelled. `cancel_token` must already be registered
/// against every `until` wait-key this rule declares (the test driver's
/// job, spec §4.5) before this function is spawned.
pub async fn run_rule<C: Clock>(ctx: Arc<Context<C>>, rule: Rule, cancel_token: CancellationToken) -> RuleResult {
    let interval = ctx.config().interval;
    let has_until = has_mode(&rule, ConditionMode::Until);
    let has_periodic = has_mode(&rule, ConditionMode::Periodic);
    let on_globs = rule.event_globs();
    let mut on_subscription = None;

    loop {
        // 1. Enter phase.
        let mut cancelled = false;
        loop {
            let states = ctx.states();
            if rule.ready_to_enter(&states) {
                break;
            }
            tokio::select! {
                _ = cancel_token.cancelled() => { cancelled = true; break; }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        if cancelled {
            // Boundary behavior (spec §8): a rule cancelled before it ever
            // entered `running` still publishes exactly one `rule.done`,
            // without invoking its task.
            if let Some(id) = on_subscription.take() {
                ctx.bus().unsubscribe(id);
            }
            ctx.set_state(&rule.name, "complete");
            ctx.dispatch(Event::rule_done(&rule.name, true));
            return RuleResult::Completed(true);
        }

        // 2. Lifecycle running.
        ctx.set_state(&rule.name, "running");

        // 3. Run phase.
        if !on_globs.is_empty() {
            if on_subscription.is_none() {
                let globs: Vec<Predicate> = on_globs.iter().map(|g| mtx_bus::glob(g.to_string())).collect();
                let any_glob: Predicate = Arc::new(move |event: &Event| globs.iter().any(|p| p(event)));
                let predicates = vec![any_glob, lifecycle_running(ctx.clone(), rule.name.clone())];
                on_subscription = Some(ctx.bus().subscribe(
                    Arc::new(OnHandler { ctx: ctx.clone(), rule: rule.clone() }),
                    predicates,
                ));
            }
            // The subscription drives execution; the run phase itself idles.
        } else {
            match invoke_task(&ctx, &rule, None).await {
                Ok(_) => {}
                Err(TaskInvokeError::TestFailure(failure)) => {
                    ctx.set_state(&rule.name, "complete");
                    ctx.dispatch(Event::rule_done(&rule.name, false));
                    return RuleResult::Gated(failure);
                }
                Err(TaskInvokeError::Other(msg)) => {
                    tracing::error!(rule = %rule.name, error = %msg, "task handler failed");
                    ctx.set_state(&rule.name, "complete");
                    ctx.dispatch(Event::rule_done(&rule.name, false));
                    return RuleResult::Errored(msg);
                }
            }
        }

        // 4. Exit phase.
        if (!has_until && !has_periodic) || cancel_token.is_cancelled() {
            if let Some(id) = on_subscription.take() {
                ctx.bus().unsubscribe(id);
            }
            ctx.set_state(&rule.name, "complete");
            ctx.dispatch(Event::rule_done(&rule.name, true));
            return RuleResult::Completed(true);
        }

        // 5. Reschedule.
        if has_periodic {
            let period = periodic_condition(&rule)
                .and_then(|c| c.periodic_seconds().ok())
                .unwrap_or(interval.as_secs_f64());
            ctx.set_state(&rule.name, "paused");
            tokio::select! {
                _ = cancel_token.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_secs_f64(period)) => {}
            }
        } else {
            tokio::select! {
                _ = cancel_token.cancelled() => {}
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
