// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `raw` output skin (spec §6 `--skin, -s {tui|raw}`): a bus subscriber
//! that prints test/rule progress to stdout. The terminal UI (`tui`) is an
//! out-of-scope external collaborator (spec §1); this crate only ships the
//! fallback renderer `--skin tui` degrades to.

use mtx_bus::{Bus, FnHandler};
use mtx_core::{kinds, Clock, Event};

/// Subscribe the raw-skin printer to `bus`. Mirrors the shape of
/// [`mtx_engine::logging::subscribe_logging_bridge`]: one predicate-filtered
/// handler per concern, all feeding the same drain loop.
pub fn subscribe_raw_skin<C: Clock>(bus: &Bus<C>) {
    bus.subscribe(
        FnHandler::new(move |event: Event| async move {
            match event.kind.as_str() {
                kinds::TEST_START => {
                    let test = event.payload.get("test").and_then(|v| v.as_str()).unwrap_or("?");
                    println!("=== {test} ===");
                }
                kinds::RULE_DONE => {
                    let rule = event.payload.get("rule").and_then(|v| v.as_str()).unwrap_or("?");
                    let result = event.payload.get("result").and_then(|v| v.as_bool()).unwrap_or(true);
                    println!("  rule {rule}: {}", if result { "ok" } else { "FAILED" });
                }
                kinds::TEST_COMPLETE => {
                    let test = event.payload.get("test").and_then(|v| v.as_str()).unwrap_or("?");
                    let result = event.payload.get("result").and_then(|v| v.as_bool()).unwrap_or(true);
                    println!("=== {test}: {} ===", if result { "PASS" } else { "FAIL" });
                }
                kinds::CHAOS_ACTIVATE => {
                    let action = event.payload.get("action").and_then(|v| v.as_str()).unwrap_or("?");
                    println!("  chaos: {action}");
                }
                _ => {}
            }
            Ok(())
        }),
        Vec::new(),
    );
}

#[cfg(test)]
#[path = "skin_tests.rs"]
mod tests;
