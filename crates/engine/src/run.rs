// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level suite runner (spec §4.5's "between tests" paragraph): iterates
//! a [`Suite`]'s tests through [`crate::driver::run_test`], resetting the
//! cluster model (or just the state map, per `--keep-models`) between them
//! and invoking an external crashdump collector on gating failures.

use crate::context::Context;
use crate::driver::{run_test, TestOutcome};
use mtx_adapters::task::TaskContext;
use mtx_core::{Clock, Suite};
use std::sync::Arc;
use std::time::Duration;

/// External crashdump collection hook (spec §1 "out of scope: crashdump
/// collection" — this trait is the seam a caller plugs a real collector
/// into; `mtx-engine` itself only ships the no-op).
pub trait CrashdumpCollector: Send + Sync {
    fn collect(&self, test: &str);
}

pub struct NoopCrashdumpCollector;

impl CrashdumpCollector for NoopCrashdumpCollector {
    fn collect(&self, _test: &str) {}
}

/// Result of driving an entire suite (spec §6's exit-code taxonomy, rolled
/// up across every test).
#[derive(Debug, Clone)]
pub struct RunReport {
    pub exit_code: i32,
    pub outcomes: Vec<TestOutcome>,
}

const RESET_MAX_ATTEMPTS: u32 = 5;
const RESET_BASE_BACKOFF: Duration = Duration::from_millis(200);

/// Severity ranking used to roll many tests' exit codes into one (200 >
/// 101 > 1 > 0); not specified directly by spec.md, but the only ordering
/// consistent with its exit-code descriptions ("worse" outcomes should
/// never be masked by an earlier, milder one).
fn worse(a: i32, b: i32) -> i32 {
    fn rank(code: i32) -> i32 {
        match code {
            200 => 3,
            101 => 2,
            1 => 1,
            _ => 0,
        }
    }
    if rank(b) > rank(a) {
        b
    } else {
        a
    }
}

/// Drives a [`Suite`] to completion against one [`Context`] (spec §4.5).
pub struct Engine<C: Clock> {
    ctx: Arc<Context<C>>,
    suite: Suite,
    crashdump: Arc<dyn CrashdumpCollector>,
}

impl<C: Clock> Engine<C> {
    pub fn new(ctx: Arc<Context<C>>, suite: Suite) -> Self {
        Self { ctx, suite, crashdump: Arc::new(NoopCrashdumpCollector) }
    }

    pub fn with_crashdump_collector(mut self, collector: Arc<dyn CrashdumpCollector>) -> Self {
        self.crashdump = collector;
        self
    }

    /// Run every test in the suite, resetting cluster/state between them
    /// (spec §4.5). Stops early on fail-fast (config) or on exhausting
    /// cluster-reset retries (exit 200).
    pub async fn run(&self) -> RunReport {
        let total = self.suite.tests.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut exit_code = 0;

        for (index, test) in self.suite.tests.iter().enumerate() {
            let outcome = run_test(&self.ctx, test).await;
            exit_code = worse(exit_code, outcome.exit_code);

            if outcome.exit_code == 101 {
                self.crashdump.collect(&test.name);
            }

            let stop_early = self.ctx.config().fail_fast && outcome.exit_code != 0;
            outcomes.push(outcome);
            if stop_early {
                break;
            }

            if index + 1 == total {
                continue;
            }

            if self.ctx.config().keep_models {
                self.ctx.clear_state_and_waiters();
            } else if self.reset_cluster().await {
                self.ctx.clear_state_and_waiters();
            } else {
                exit_code = worse(exit_code, 200);
                break;
            }
        }

        RunReport { exit_code, outcomes }
    }

    /// Destroy and recreate the cluster model, retrying with exponential
    /// backoff (spec §4.5: "Model destruction retries up to N times with
    /// exponential backoff on error"). Returns `false` once every attempt
    /// has failed.
    async fn reset_cluster(&self) -> bool {
        let mut backoff = RESET_BASE_BACKOFF;
        for attempt in 1..=RESET_MAX_ATTEMPTS {
            let result = async {
                self.ctx.cluster().destroy().await?;
                self.ctx.cluster().deploy().await
            }
            .await;

            match result {
                Ok(()) => return true,
                Err(e) => {
                    tracing::warn!(attempt, max = RESET_MAX_ATTEMPTS, error = %e, "cluster reset failed, retrying");
                    if attempt < RESET_MAX_ATTEMPTS {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
