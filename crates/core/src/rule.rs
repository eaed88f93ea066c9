// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule: a named list of conditions plus the task it runs while they hold
//! (spec §3, §4.4).

use crate::condition::Condition;
use crate::task::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(rename = "do")]
    pub task: Task,
}

impl Rule {
    pub fn new(name: impl Into<String>, task: Task) -> Self {
        Self { name: name.into(), conditions: Vec::new(), task }
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    /// All conditions currently satisfied (the enter-phase logical AND,
    /// spec §4.4 step 1). An unconditional rule (`conditions` empty) always
    /// enters.
    pub fn ready_to_enter(&self, states: &crate::state::StateMap) -> bool {
        self.conditions.iter().all(|c| c.gates_entry(states))
    }

    /// `until` conditions' wait-keys this rule should register once it's
    /// waiting to enter.
    pub fn wait_keys(&self) -> Vec<String> {
        self.conditions.iter().filter_map(Condition::wait_key).collect()
    }

    /// `on` conditions' event globs (a rule may react to bus events in
    /// addition to, or instead of, state-map gating).
    pub fn event_globs(&self) -> Vec<&str> {
        self.conditions.iter().filter_map(Condition::event_glob).collect()
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
