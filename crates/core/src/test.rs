// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test: a named, ordered list of rules (spec §3).

use crate::rule::Rule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Test {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: String::new(), rules: Vec::new() }
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }
}

#[cfg(test)]
#[path = "test_tests.rs"]
mod tests;
