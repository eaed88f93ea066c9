// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging bridge (spec §6): a bus subscriber forwarding `logging.message`
//! events to `tracing`, so engine-internal log lines flow through the same
//! bus every other subsystem observes.

use mtx_bus::{eq, Bus, FnHandler};
use mtx_core::{kinds, Clock, Event};

/// Subscribe a handler that re-emits every `logging.message` event as a
/// `tracing` event at the level named in its payload (`level`, default
/// `info`). The payload's `message` field becomes the tracing message.
pub fn subscribe_logging_bridge<C: Clock>(bus: &Bus<C>) {
    bus.subscribe(
        FnHandler::new(move |event: Event| async move {
            let message = event.payload.get("message").and_then(|v| v.as_str()).unwrap_or_default();
            let level = event.payload.get("level").and_then(|v| v.as_str()).unwrap_or("info");
            match level {
                "error" => tracing::error!(origin = %event.origin, "{message}"),
                "warn" | "warning" => tracing::warn!(origin = %event.origin, "{message}"),
                "debug" => tracing::debug!(origin = %event.origin, "{message}"),
                "trace" => tracing::trace!(origin = %event.origin, "{message}"),
                _ => tracing::info!(origin = %event.origin, "{message}"),
            }
            Ok(())
        }),
        vec![eq(kinds::LOGGING_MESSAGE)],
    );
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
