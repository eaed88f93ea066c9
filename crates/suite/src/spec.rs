// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suite-spec YAML parsing (spec §4.3): the declarative `{fmt, tests: [...]}`
//! shape an operator writes, translated into `mtx_core`'s domain types.
//!
//! The declarative shape and the domain types differ on purpose: a rule's
//! condition clauses (`when`, `after`, ...) are sibling keys of `do` in the
//! spec, not a nested `conditions: [...]` list, so this crate owns a
//! dedicated `RuleSpec` deserialize target and converts it, rather than
//! deriving `Deserialize` for `mtx_core::Rule` itself (mirroring the
//! teacher's split of `oj-runbook`'s on-disk DSL shape from `oj-core`'s
//! domain types).

use mtx_core::{Condition, ConditionMode, ParseError, Rule, Suite, Task, Test};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SuiteSpec {
    #[serde(default = "default_fmt")]
    fmt: i64,
    #[serde(default)]
    tests: Vec<TestSpec>,
}

fn default_fmt() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
struct TestSpec {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    #[serde(rename = "do")]
    do_clause: Option<serde_yaml::Value>,
    gating: Option<bool>,
    when: Option<String>,
    after: Option<String>,
    until: Option<String>,
    #[serde(rename = "while")]
    while_: Option<String>,
    on: Option<String>,
    periodic: Option<String>,
}

impl RuleSpec {
    fn into_rule(self, test_name: &str, index: usize) -> Result<Rule, ParseError> {
        let do_clause = self
            .do_clause
            .ok_or_else(|| ParseError::MissingDoClause(format!("{test_name}#{index}")))?;
        let mut task: Task = serde_yaml::from_value(do_clause)
            .map_err(|e| ParseError::Yaml(e.to_string()))?;
        if let Some(gating) = self.gating {
            task.gating = gating;
        }

        let mut conditions = Vec::new();
        for (mode, statement) in [
            (ConditionMode::When, self.when),
            (ConditionMode::After, self.after),
            (ConditionMode::Until, self.until),
            (ConditionMode::While, self.while_),
            (ConditionMode::On, self.on),
            (ConditionMode::Periodic, self.periodic),
        ] {
            if let Some(statement) = statement {
                if mode == ConditionMode::Periodic {
                    Condition::new(mode, statement.clone()).periodic_seconds()?;
                }
                conditions.push(Condition::new(mode, statement));
            }
        }

        Ok(Rule::new(task.name().to_string(), task).with_conditions(conditions))
    }
}

impl TestSpec {
    fn into_test(self, fmt: i64) -> Result<Test, ParseError> {
        if fmt != 1 {
            return Err(ParseError::UnsupportedFormat(fmt));
        }
        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, rule_spec) in self.rules.into_iter().enumerate() {
            rules.push(rule_spec.into_rule(&self.name, index)?);
        }
        Ok(Test { name: self.name, description: self.description, rules })
    }
}

/// Parse one suite-spec YAML document (spec §4.3) into a [`Suite`].
pub fn parse_suite(yaml: &str) -> Result<Suite, ParseError> {
    let spec: SuiteSpec = serde_yaml::from_str(yaml).map_err(|e| ParseError::Yaml(e.to_string()))?;
    if spec.fmt != 1 {
        return Err(ParseError::UnsupportedFormat(spec.fmt));
    }
    let mut tests = Vec::with_capacity(spec.tests.len());
    for test_spec in spec.tests {
        tests.push(test_spec.into_test(spec.fmt)?);
    }
    Ok(Suite::new(tests))
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
