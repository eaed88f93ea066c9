// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task resolver & dispatcher (spec §4.2): the seam between a rule's `do`
//! clause and the in-process handler or subprocess it names.
//!
//! `TaskContext` is a dependency-inversion trait: `mtx-engine::Context` owns
//! the state map, timeline, cluster handle and bus, and implements this
//! trait so that `mtx-adapters` (and the handlers it dispatches to) can act
//! on a run's context without this crate depending on `mtx-engine`.

pub mod builtin;
pub mod registry;
pub mod subprocess;

pub use registry::{Resolved, TaskRegistry};
pub use subprocess::invoke_as_process;

use async_trait::async_trait;
use mtx_core::{ClusterModel, Config, Event, Rule, Suite, Task, TestFailure};
use serde::Serialize;
use std::collections::HashMap;

/// Narrow view onto a run's context that task handlers need (spec §3's
/// Context, filtered to what §4.2 dispatch requires).
#[async_trait]
pub trait TaskContext: Send + Sync {
    /// Current value of a state-map entry, if set.
    fn get_state(&self, name: &str) -> Option<String>;

    /// A snapshot of the entire state map (used for the subprocess JSON view).
    fn states(&self) -> HashMap<String, String>;

    /// Write a state-map entry (spec §3: publishes `state.change` iff
    /// changed, cancels matching waiters).
    fn set_state(&self, name: &str, value: &str);

    /// Publish an event on the bus.
    fn dispatch(&self, event: Event);

    /// The live cluster handle (spec §1's out-of-scope client, reached only
    /// through this trait boundary).
    fn cluster(&self) -> &dyn ClusterModel;

    /// Run configuration.
    fn config(&self) -> &Config;

    /// The suite this run is driving (for the subprocess JSON view).
    fn suite(&self) -> &Suite;

    /// The append-only timeline of events seen so far.
    fn timeline(&self) -> Vec<Event>;
}

/// The filtered, JSON-serializable view of a `Context` sent to subprocess
/// tasks on stdin (spec §4.2: "only attributes flagged as public").
#[derive(Debug, Serialize)]
pub struct ProcessView<'a> {
    pub suite: &'a Suite,
    pub states: HashMap<String, String>,
    pub timeline: Vec<Event>,
    pub config_path: String,
    pub args: &'a HashMap<String, serde_json::Value>,
    pub event: Option<&'a Event>,
}

/// Outcome of invoking a task, surfaced to the rule runner (spec §4.4 step 3).
#[derive(Debug)]
pub enum TaskInvokeError {
    /// `TestFailure` (spec §7): expected, first-class failure. Propagates to
    /// the runner and then the driver.
    TestFailure(TestFailure),
    /// Any other error: logged, counted as a failed task, the runner returns
    /// `false` without re-raising (spec §4.4 "Failure semantics").
    Other(String),
}

impl std::fmt::Display for TaskInvokeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TestFailure(e) => write!(f, "{e}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TaskInvokeError {}

/// An in-process task handler (spec §4.2 "Invoke-in-process").
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn invoke(
        &self,
        ctx: &dyn TaskContext,
        rule: &Rule,
        task: &Task,
        event: Option<&Event>,
    ) -> Result<bool, TaskInvokeError>;
}
