// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chaos plan data types (spec §3, §4.6): the YAML-serializable shape a
//! plan is generated into, persisted as, and loaded back from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `{selector: name, <kw>: <val>, ...}` (spec §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorDescriptor {
    pub selector: String,
    #[serde(flatten)]
    pub kwargs: HashMap<String, serde_json::Value>,
}

impl SelectorDescriptor {
    pub fn new(selector: impl Into<String>) -> Self {
        Self { selector: selector.into(), kwargs: HashMap::new() }
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }
}

/// `{action: name, selectors: [...], ...extraArgs}` (spec §3, §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub action: String,
    #[serde(default)]
    pub selectors: Vec<SelectorDescriptor>,
    #[serde(flatten)]
    pub extra_args: HashMap<String, serde_json::Value>,
}

impl PlannedAction {
    pub fn new(action: impl Into<String>) -> Self {
        Self { action: action.into(), selectors: Vec::new(), extra_args: HashMap::new() }
    }

    pub fn with_selectors(mut self, selectors: Vec<SelectorDescriptor>) -> Self {
        self.selectors = selectors;
        self
    }
}

/// `{actions: [...]}` (spec §3, §4.6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaosPlan {
    pub actions: Vec<PlannedAction>,
}

impl ChaosPlan {
    pub fn new(actions: Vec<PlannedAction>) -> Self {
        Self { actions }
    }
}

#[cfg(test)]
#[path = "chaos_tests.rs"]
mod tests;
