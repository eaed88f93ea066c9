// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mtx_core::Event;

#[test]
fn eq_matches_exact_kind_only() {
    let pred = eq("rule.done");
    assert!(pred(&Event::rule_done("deploy", true)));
    assert!(!pred(&Event::rule_done("deploy", true).tap_kind("rule.create")));
}

#[test]
fn prefixed_matches_by_prefix() {
    let pred = prefixed("rule.");
    assert!(pred(&Event::rule_done("deploy", true)));
    assert!(pred(&Event::rule_create("deploy")));
    assert!(!pred(&Event::test_start("smoke")));
}

#[test]
fn glob_matches_dotted_wildcard() {
    let pred = glob("chaos.*");
    assert!(pred(&Event::new("chaos", "chaos.activate", serde_json::json!({}))));
    assert!(!pred(&Event::new("driver", "test.start", serde_json::json!({}))));
}

#[test]
fn glob_with_invalid_pattern_never_matches() {
    let pred = glob("[");
    assert!(!pred(&Event::new("chaos", "chaos.activate", serde_json::json!({}))));
}

trait TapKind {
    fn tap_kind(self, kind: &str) -> Self;
}

impl TapKind for Event {
    fn tap_kind(mut self, kind: &str) -> Self {
        self.kind = kind.into();
        self
    }
}
