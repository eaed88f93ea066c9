// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test driver (spec §4.5): per-test lifecycle, fail-fast-on-exception
//! collection of rule runners, and exit-code classification.

use crate::context::Context;
use crate::runner::{run_rule, RuleResult};
use futures_util::stream::{FuturesUnordered, StreamExt};
use mtx_adapters::task::TaskContext;
use mtx_core::{Clock, Event, Test, TestFailure};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of driving one [`Test`] (spec §4.5's classification table).
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub test: String,
    pub success: bool,
    pub exit_code: i32,
    pub pending: usize,
}

/// Run every rule in `test` to completion (or first gating/infra failure),
/// then classify the result (spec §4.5).
pub async fn run_test<C: Clock>(ctx: &Arc<Context<C>>, test: &Test) -> TestOutcome {
    ctx.dispatch(Event::test_start(&test.name));

    let mut tokens = Vec::with_capacity(test.rules.len());
    let mut joins = FuturesUnordered::new();
    for rule in &test.rules {
        let token = CancellationToken::new();
        for wait_key in rule.wait_keys() {
            ctx.register_waiter(&wait_key, token.clone(), rule.name.clone());
        }
        tokens.push(token.clone());

        let ctx2 = ctx.clone();
        let rule2 = rule.clone();
        joins.push(tokio::spawn(async move { run_rule(ctx2, rule2, token).await }));
    }

    let total = joins.len();
    let mut results = Vec::with_capacity(total);
    let mut gating_failure: Option<TestFailure> = None;
    let mut errored = false;

    while let Some(joined) = joins.next().await {
        let result = match joined {
            Ok(result) => result,
            Err(join_error) => RuleResult::Errored(format!("rule runner task panicked: {join_error}")),
        };

        let stop = match &result {
            RuleResult::Gated(failure) => {
                if ctx.config().should_gate(&failure.task) {
                    gating_failure = Some(failure.clone());
                    true
                } else {
                    false
                }
            }
            RuleResult::Errored(_) => {
                errored = true;
                true
            }
            RuleResult::Completed(_) => false,
        };

        results.push(result);
        if stop {
            break;
        }
    }

    let pending = total - results.len();
    if pending > 0 {
        tracing::warn!(test = %test.name, pending, "rule runners left pending after fail-fast stop");
    }

    // Pending runners are logged, not force-killed (spec §4.5): dropping
    // the remaining `FuturesUnordered` entries detaches their spawned
    // tasks rather than aborting them.
    drop(joins);

    let exit_code = if gating_failure.is_some() {
        101
    } else if errored {
        1
    } else {
        0
    };

    let success = exit_code == 0
        && results.iter().all(|r| match r {
            RuleResult::Completed(ok) => *ok,
            // A non-gating TestFailure is logged but does not fail the test
            // (spec §7: "non-gating ⇒ logged, test still passes").
            RuleResult::Gated(_) => true,
            RuleResult::Errored(_) => false,
        });

    for token in tokens {
        token.cancel();
    }

    ctx.dispatch(Event::test_complete(&test.name, success));

    TestOutcome { test: test.name.clone(), success, exit_code, pending }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
