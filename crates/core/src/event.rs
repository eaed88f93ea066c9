// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types pushed on the [bus](../../mtx_bus/index.html).
//!
//! `Event.kind` is a dotted string rather than a closed enum: the `on`
//! condition mode glob-matches kinds the bus was never told about at compile
//! time, so a string newtype is the honest representation (see SPEC_FULL.md
//! §3). [`kinds`] holds `&str` constants for every kind this engine itself
//! publishes; external subscribers (UI, XUnit writer) are free to match on
//! kinds this crate does not know about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// A dotted event kind, e.g. `rule.done`, `state.change`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(pub String);

impl EventKind {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this kind starts with `prefix` — backs the `prefixed()` bus predicate.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for EventKind {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// String constants for every event kind this engine publishes (spec §6).
pub mod kinds {
    pub const STATE_CHANGE: &str = "state.change";
    pub const RULE_CREATE: &str = "rule.create";
    pub const RULE_DONE: &str = "rule.done";
    pub const TEST_SCHEDULE: &str = "test.schedule";
    pub const TEST_START: &str = "test.start";
    pub const TEST_COMPLETE: &str = "test.complete";
    pub const TEST_FINISH: &str = "test.finish";
    pub const MODEL_NEW: &str = "model.new";
    pub const MODEL_CHANGE: &str = "model.change";
    pub const CHAOS_ACTIVATE: &str = "chaos.activate";
    pub const LOGGING_MESSAGE: &str = "logging.message";
    pub const UI_CHANGE: &str = "ui.change";
    pub const SHUTDOWN: &str = "shutdown";
}

/// An immutable record pushed on the bus (spec §3).
///
/// `time` and `created` are normally filled in by [`Bus::dispatch`][bus] at
/// enqueue time; the constructors here set `created` eagerly via
/// `#[track_caller]` so a caller-supplied `Event` already carries provenance
/// even before it reaches the bus.
///
/// [bus]: ../../mtx_bus/struct.Bus.html
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic seconds, stamped by the bus at dispatch time.
    pub time: f64,
    pub origin: String,
    pub kind: EventKind,
    pub payload: serde_json::Value,
    /// Provenance: `{file}:{line}` of the call site that created this event.
    pub created: String,
}

impl Event {
    #[track_caller]
    pub fn new(origin: impl Into<String>, kind: impl Into<EventKind>, payload: serde_json::Value) -> Self {
        let loc = Location::caller();
        Self {
            time: 0.0,
            origin: origin.into(),
            kind: kind.into(),
            payload,
            created: format!("{}:{}", loc.file(), loc.line()),
        }
    }

    #[track_caller]
    pub fn state_change(name: &str, old_value: Option<&str>, new_value: &str) -> Self {
        Self::new(
            "context",
            kinds::STATE_CHANGE,
            serde_json::json!({ "name": name, "old_value": old_value, "new_value": new_value }),
        )
    }

    #[track_caller]
    pub fn rule_create(rule: &str) -> Self {
        Self::new("engine", kinds::RULE_CREATE, serde_json::json!({ "rule": rule }))
    }

    #[track_caller]
    pub fn rule_done(rule: &str, result: bool) -> Self {
        Self::new("engine", kinds::RULE_DONE, serde_json::json!({ "rule": rule, "result": result }))
    }

    #[track_caller]
    pub fn test_start(test: &str) -> Self {
        Self::new("driver", kinds::TEST_START, serde_json::json!({ "test": test }))
    }

    #[track_caller]
    pub fn test_complete(test: &str, result: bool) -> Self {
        Self::new("driver", kinds::TEST_COMPLETE, serde_json::json!({ "test": test, "result": result }))
    }

    #[track_caller]
    pub fn test_finish(test: &str, exit_code: i32) -> Self {
        Self::new("driver", kinds::TEST_FINISH, serde_json::json!({ "test": test, "exit_code": exit_code }))
    }

    #[track_caller]
    pub fn chaos_activate(action: &str, kwargs: serde_json::Value) -> Self {
        let mut payload = kwargs;
        if let serde_json::Value::Object(ref mut map) = payload {
            map.insert("action".to_string(), serde_json::Value::String(action.to_string()));
        }
        Self::new("chaos", kinds::CHAOS_ACTIVATE, payload)
    }

    #[track_caller]
    pub fn model_new(model_name: &str) -> Self {
        Self::new("cluster", kinds::MODEL_NEW, serde_json::json!({ "model": model_name }))
    }

    /// `true` iff `kind` is exactly `k` — backs the `eq()` bus predicate.
    pub fn kind_is(&self, k: &str) -> bool {
        self.kind.as_str() == k
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} {}", self.origin, self.kind, self.payload)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
