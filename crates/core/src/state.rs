// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared state map (spec §3): a `name -> value` string blackboard.
//!
//! State names may be dotted (`health.status`). This module only defines the
//! map type and the pure wait-key computation; the live setter that publishes
//! `state.change` and cancels waiters belongs to `Context` (mtx-engine), which
//! owns both the map and the bus handle.

use std::collections::HashMap;

pub type StateMap = HashMap<String, String>;

/// Wait-keys satisfied by writing `name = value`.
///
/// A waiter registered under wait-key `"name.value"` is cancelled by this
/// write; additionally, when `value == "complete"`, a waiter registered
/// under the bare key `"name"` is cancelled too (spec §3 invariant).
pub fn satisfied_wait_keys(name: &str, value: &str) -> Vec<String> {
    let mut keys = vec![format!("{name}.{value}")];
    if value == "complete" {
        keys.push(name.to_string());
    }
    keys
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
