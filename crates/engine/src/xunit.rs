// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! XUnit report writer (spec §6): a bus subscriber that aggregates
//! `test.start` / `rule.done` / `test.complete` into one `<testcase>` per
//! test and serializes the result on demand.

use mtx_bus::{eq, Bus, FnHandler};
use mtx_core::{kinds, Clock, Event};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

struct InFlight {
    start_time: f64,
    failures: Vec<String>,
}

struct XunitState {
    entity: String,
    current: Option<(String, InFlight)>,
    testcases: Vec<TestCase>,
}

/// Subscribes to the bus and accumulates one [`TestCase`] per test run
/// (spec §6's XUnit persisted-state entry). `entity` names the run (the
/// resolved model name, or a fallback) and prefixes every testcase name.
pub struct XunitCollector {
    state: Arc<Mutex<XunitState>>,
}

impl XunitCollector {
    /// Subscribe a fresh collector to `bus`. The returned value owns the
    /// accumulated test cases; call [`XunitCollector::write`] once the run
    /// is finished.
    pub fn subscribe<C: Clock>(bus: &Bus<C>, entity: impl Into<String>) -> Self {
        let state = Arc::new(Mutex::new(XunitState { entity: entity.into(), current: None, testcases: Vec::new() }));

        let on_start = state.clone();
        bus.subscribe(
            FnHandler::new(move |event: Event| {
                let on_start = on_start.clone();
                async move {
                    let test = event.payload.get("test").and_then(|v| v.as_str()).unwrap_or_default();
                    on_start.lock().current = Some((test.to_string(), InFlight { start_time: event.time, failures: Vec::new() }));
                    Ok(())
                }
            }),
            vec![eq(kinds::TEST_START)],
        );

        let on_rule_done = state.clone();
        bus.subscribe(
            FnHandler::new(move |event: Event| {
                let on_rule_done = on_rule_done.clone();
                async move {
                    let success = event.payload.get("result").and_then(|v| v.as_bool()).unwrap_or(true);
                    if !success {
                        let rule = event.payload.get("rule").and_then(|v| v.as_str()).unwrap_or("?");
                        let mut state = on_rule_done.lock();
                        if let Some((_, inflight)) = state.current.as_mut() {
                            inflight.failures.push(format!("rule '{rule}' failed"));
                        }
                    }
                    Ok(())
                }
            }),
            vec![eq(kinds::RULE_DONE)],
        );

        let on_complete = state.clone();
        bus.subscribe(
            FnHandler::new(move |event: Event| {
                let on_complete = on_complete.clone();
                async move {
                    let mut state = on_complete.lock();
                    let entity = state.entity.clone();
                    if let Some((test, inflight)) = state.current.take() {
                        let time = (event.time - inflight.start_time).max(0.0);
                        let success = event.payload.get("result").and_then(|v| v.as_bool()).unwrap_or(inflight.failures.is_empty());
                        let failure = (!success || !inflight.failures.is_empty()).then(|| Failure {
                            message: if inflight.failures.is_empty() { "test failed".to_string() } else { inflight.failures.join("; ") },
                            output: inflight.failures.join("\n"),
                        });
                        state.testcases.push(TestCase { name: format!("{entity}: {test}"), time, failure });
                    }
                    Ok(())
                }
            }),
            vec![eq(kinds::TEST_COMPLETE)],
        );

        Self { state }
    }

    /// Serialize accumulated testcases as XUnit XML and write them to `path`.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let state = self.state.lock();
        let failures = state.testcases.iter().filter(|t| t.failure.is_some()).count();
        let doc = TestSuites {
            testsuite: TestSuite { name: "matrix".to_string(), tests: state.testcases.len(), failures, testcase: state.testcases.clone() },
        };
        let body = quick_xml::se::to_string(&doc).map_err(std::io::Error::other)?;
        std::fs::write(path, format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
    }
}

#[derive(Serialize, Clone)]
#[serde(rename = "testsuites")]
struct TestSuites {
    testsuite: TestSuite,
}

#[derive(Serialize, Clone)]
struct TestSuite {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@tests")]
    tests: usize,
    #[serde(rename = "@failures")]
    failures: usize,
    testcase: Vec<TestCase>,
}

#[derive(Serialize, Clone)]
struct TestCase {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@time")]
    time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<Failure>,
}

#[derive(Serialize, Clone)]
struct Failure {
    #[serde(rename = "@message")]
    message: String,
    #[serde(rename = "$text")]
    output: String,
}

#[cfg(test)]
#[path = "xunit_tests.rs"]
mod tests;
