// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: a named unit of work, in-process or subprocess (spec §3, §4.2).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A unit of work bound to a [`Rule`](crate::rule::Rule).
///
/// `name` is derived, not stored: it is the basename of the dotted `command`
/// (`"tasks.chaos.chaos"` -> `"chaos"`), matching `Action.name` in the
/// original implementation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub command: String,
    #[serde(default)]
    pub args: HashMap<String, serde_json::Value>,
    #[serde(default = "default_gating")]
    pub gating: bool,
}

fn default_gating() -> bool {
    true
}

/// A rule's `do` clause (spec §4.3): either a bare command string, or a
/// mapping with at least `command`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaskSpec {
    Command(String),
    Full {
        #[serde(alias = "task")]
        command: String,
        #[serde(default)]
        args: HashMap<String, serde_json::Value>,
        #[serde(default = "default_gating")]
        gating: bool,
    },
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match TaskSpec::deserialize(deserializer)? {
            TaskSpec::Command(command) => Task::new(command),
            TaskSpec::Full { command, args, gating } => Task { command, args, gating },
        })
    }
}

impl Task {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), args: HashMap::new(), gating: true }
    }

    /// Basename of a dotted command: `"tasks.chaos.chaos"` -> `"chaos"`.
    pub fn name(&self) -> &str {
        match self.command.rsplit_once('.') {
            Some((_, short)) => short,
            None => &self.command,
        }
    }

    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }

    pub fn arg_bool(&self, key: &str) -> Option<bool> {
        self.args.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
