// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy (spec §7).
//!
//! Each variant maps to a specific exit-code decision made by the test
//! driver (`mtx-engine::driver`); this crate only defines the types, since
//! the propagation policy — "tasks surface to runners, runners surface to
//! the driver, driver converts to exit codes" — is the driver's job.

use crate::task::Task;
use thiserror::Error;

/// Malformed suite or missing `do` clause. Aborts load; exit 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("rule missing required 'do' clause: {0}")]
    MissingDoClause(String),
    #[error("suite in unsupported format: {0}")]
    UnsupportedFormat(i64),
    #[error("unknown condition mode: {0}")]
    UnknownConditionMode(String),
    #[error("periodic condition statement is not a non-negative number of seconds: {0}")]
    InvalidPeriodic(String),
    #[error("invalid suite YAML: {0}")]
    Yaml(String),
}

/// Unknown task path/identifier. Aborts that rule; propagates as task exception.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("task '{0}' not found in registry, filesystem, or module namespace")]
    NotFound(String),
}

/// Expected, first-class failure of a task (spec §7).
#[derive(Debug, Error, Clone)]
#[error("task failure in '{}': {message}", task.name())]
pub struct TestFailure {
    pub task: Task,
    pub message: String,
}

impl TestFailure {
    pub fn new(task: Task, message: impl Into<String>) -> Self {
        Self { task, message: message.into() }
    }
}

/// Cluster or cloud-side problem: deploy error, controller unreachable,
/// model destroy failed after retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InfraFailure {
    #[error("failed to deploy: {0}")]
    DeployFailed(String),
    #[error("cluster controller unreachable: {0}")]
    ControllerUnreachable(String),
    #[error("model destroy failed after {attempts} attempts: {reason}")]
    ModelDestroyFailed { attempts: u32, reason: String },
    #[error("model creation failed: {0}")]
    ModelCreateFailed(String),
}

/// Chaos planner rejects a plan or cannot generate one. Aborts the chaos
/// action only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidPlan {
    #[error("plan missing 'actions' key")]
    MissingActions,
    #[error("action at index {0} missing 'action' key")]
    MissingActionName(usize),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown selector: {0}")]
    UnknownSelector(String),
}

/// Chaos planner cannot generate a plan against the current cluster model
/// (e.g. no objects of the needed type).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidModel {
    #[error("no machines in the model")]
    NoMachines,
    #[error("no units in the model")]
    NoUnits,
    #[error("no applications in the model")]
    NoApplications,
}

/// Selector chain produced empty output. Not an error — the action is skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no objects found for selector chain on action '{action}'")]
pub struct NoObjects {
    pub action: String,
}

/// Top-level error uniting every crate-boundary error for callers (e.g. the
/// CLI) that need one type to map to a process exit code.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    TestFailure(#[from] TestFailure),
    #[error(transparent)]
    Infra(#[from] InfraFailure),
    #[error(transparent)]
    InvalidPlan(#[from] InvalidPlan),
    #[error(transparent)]
    InvalidModel(#[from] InvalidModel),
}
