// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mtx-core: data types and pure logic for the chaos test orchestrator —
//! IDs, events, the state map, the rule/condition/test/suite hierarchy, the
//! cluster object model trait, chaos plans, and the error taxonomy.

pub mod macros;

pub mod chaos;
pub mod clock;
pub mod cluster;
pub mod condition;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod rule;
pub mod state;
pub mod suite;
pub mod task;
pub mod test;

pub use chaos::{ChaosPlan, PlannedAction, SelectorDescriptor};
pub use clock::{Clock, FakeClock, SystemClock};
pub use cluster::{AgentStatus, Application, ClusterModel, ClusterObject, KwArgs, Machine, Unit, WorkloadStatus};
pub use condition::{Condition, ConditionMode, Statement};
pub use config::Config;
pub use error::{EngineError, InfraFailure, InvalidModel, InvalidPlan, NoObjects, ParseError, ResolutionError, TestFailure};
pub use event::{kinds, Event, EventKind};
pub use id::{ApplicationId, MachineId, UnitId};
pub use rule::Rule;
pub use state::{satisfied_wait_keys, StateMap};
pub use suite::Suite;
pub use task::Task;
pub use test::Test;
