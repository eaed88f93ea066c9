// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suite: an ordered list of tests, with name-keyed merge semantics (spec §3).

use crate::test::Test;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub tests: Vec<Test>,
}

impl Suite {
    pub fn new(tests: Vec<Test>) -> Self {
        Self { tests }
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.name == name)
    }

    /// Merge `other` onto `self` in place: tests sharing a name with a test
    /// in `other` are replaced wholesale by `other`'s version, in `other`'s
    /// order among the replaced slots; tests with a name not present in
    /// `self` are appended in `other`'s order (spec §3, §8 invariant 4/6).
    pub fn merge(&mut self, other: Suite) {
        for incoming in other.tests {
            match self.tests.iter().position(|t| t.name == incoming.name) {
                Some(idx) => self.tests[idx] = incoming,
                None => self.tests.push(incoming),
            }
        }
    }

    /// `self.merge(other)` without mutating `self`.
    pub fn merged(&self, other: Suite) -> Suite {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
