// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition: one of six activation/termination modes over the state map or
//! the bus (spec §3, §4.4).

use crate::error::ParseError;
use crate::state::StateMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionMode {
    When,
    After,
    Until,
    While,
    On,
    Periodic,
}

crate::simple_display! {
    ConditionMode {
        When => "when",
        After => "after",
        Until => "until",
        While => "while",
        On => "on",
        Periodic => "periodic",
    }
}

impl std::str::FromStr for ConditionMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "when" => Ok(Self::When),
            "after" => Ok(Self::After),
            "until" => Ok(Self::Until),
            "while" => Ok(Self::While),
            "on" => Ok(Self::On),
            "periodic" => Ok(Self::Periodic),
            other => Err(ParseError::UnknownConditionMode(other.to_string())),
        }
    }
}

/// A parsed condition statement: `key.value` (dotted) or bare `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Dotted { key: String, value: String },
    Bare { key: String },
}

/// A single gating/terminating condition on a [`Rule`](crate::rule::Rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub mode: ConditionMode,
    pub statement: String,
}

impl Condition {
    pub fn new(mode: ConditionMode, statement: impl Into<String>) -> Self {
        Self { mode, statement: statement.into() }
    }

    /// Parse `statement` into dotted or bare form. Not meaningful for
    /// `on` (a glob against event kinds) or `periodic` (a duration).
    pub fn parse_statement(&self) -> Statement {
        match self.statement.split_once('.') {
            Some((key, value)) => Statement::Dotted { key: key.to_string(), value: value.to_string() },
            None => Statement::Bare { key: self.statement.clone() },
        }
    }

    /// Bare-statement value-set implied by this condition's mode (spec §4.4 table).
    fn implied_values(&self) -> &'static [&'static str] {
        match self.mode {
            ConditionMode::When => &["running", "complete", "paused"],
            ConditionMode::After => &["complete"],
            ConditionMode::While => &["running", "paused"],
            ConditionMode::Until => &["complete"],
            ConditionMode::On | ConditionMode::Periodic => &[],
        }
    }

    /// Whether the state map currently satisfies this condition's literal
    /// target (ignoring `until`'s negation — see [`gates_entry`](Self::gates_entry)).
    pub fn target_satisfied(&self, states: &StateMap) -> bool {
        match self.parse_statement() {
            Statement::Dotted { key, value } => states.get(&key).is_some_and(|v| v == &value),
            Statement::Bare { key } => {
                let allowed = self.implied_values();
                states.get(&key).is_some_and(|v| allowed.contains(&v.as_str()))
            }
        }
    }

    /// This condition's contribution to the enter-phase logical AND
    /// (spec §4.4 step 1: "`until` condition contributes its negation").
    /// `on` and `periodic` never block entry.
    pub fn gates_entry(&self, states: &StateMap) -> bool {
        match self.mode {
            ConditionMode::Until => !self.target_satisfied(states),
            ConditionMode::On | ConditionMode::Periodic => true,
            ConditionMode::When | ConditionMode::After | ConditionMode::While => self.target_satisfied(states),
        }
    }

    /// The waiter-registry key an `until` condition registers (spec §4.5).
    /// `None` for any other mode.
    pub fn wait_key(&self) -> Option<String> {
        if self.mode != ConditionMode::Until {
            return None;
        }
        Some(match self.parse_statement() {
            Statement::Dotted { key, value } => format!("{key}.{value}"),
            Statement::Bare { key } => format!("{key}.complete"),
        })
    }

    /// For `on` conditions: the glob pattern matched against `event.kind`.
    pub fn event_glob(&self) -> Option<&str> {
        (self.mode == ConditionMode::On).then_some(self.statement.as_str())
    }

    /// For `periodic` conditions: the poll period in seconds.
    ///
    /// Non-numeric or negative statements are a `ParseError` (spec §9: "Treat
    /// non-numeric `periodic` as a ParseError").
    pub fn periodic_seconds(&self) -> Result<f64, ParseError> {
        if self.mode != ConditionMode::Periodic {
            return Err(ParseError::InvalidPeriodic(self.statement.clone()));
        }
        let secs: f64 = self
            .statement
            .parse()
            .map_err(|_| ParseError::InvalidPeriodic(self.statement.clone()))?;
        if secs < 0.0 || !secs.is_finite() {
            return Err(ParseError::InvalidPeriodic(self.statement.clone()));
        }
        Ok(secs)
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
