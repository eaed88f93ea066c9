// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Predicate helpers for subscription filtering (spec §4.1): `eq` and
//! `prefixed`. Both are pure functions of an event.

use mtx_core::Event;
use std::sync::Arc;

/// A subscription filter: all predicates on a subscription must return true
/// for its handler to fire.
pub type Predicate = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// Matches events whose kind is exactly `kind`.
pub fn eq(kind: impl Into<String>) -> Predicate {
    let kind = kind.into();
    Arc::new(move |event: &Event| event.kind_is(&kind))
}

/// Matches events whose kind starts with `prefix`.
pub fn prefixed(prefix: impl Into<String>) -> Predicate {
    let prefix = prefix.into();
    Arc::new(move |event: &Event| event.kind.has_prefix(&prefix))
}

/// Matches events whose kind glob-matches `pattern` (backs the `on`
/// condition mode, spec §4.2).
pub fn glob(pattern: impl Into<String>) -> Predicate {
    let pattern = pattern.into();
    let compiled = glob::Pattern::new(&pattern).ok();
    Arc::new(move |event: &Event| match &compiled {
        Some(p) => p.matches(event.kind.as_str()),
        None => false,
    })
}

#[cfg(test)]
#[path = "predicate_tests.rs"]
mod tests;
