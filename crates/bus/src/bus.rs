// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event bus (spec §4.1): a FIFO queue with predicate-filtered fan-out
//! to subscribers, optionally stopping delivery entirely on a handler error.

use crate::handler::{Handler, HandlerError};
use crate::predicate::Predicate;
use mtx_core::{Clock, Event};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

struct Subscription {
    handler: Arc<dyn Handler>,
    predicates: Vec<Predicate>,
}

/// A single-writer, many-reader event bus.
///
/// `notify()` is the one drain loop (spec §4.1): it must be driven by
/// exactly one task for the lifetime of the bus. `dispatch()` is
/// non-blocking and may be called from any number of concurrent callers.
pub struct Bus<C: Clock> {
    sender: mpsc::UnboundedSender<Event>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Event>>>,
    subscriptions: Mutex<Vec<(SubscriptionId, Subscription)>>,
    exit_on_exception: bool,
    shutdown: Arc<AtomicBool>,
    clock: C,
}

impl<C: Clock> Bus<C> {
    pub fn new(clock: C, exit_on_exception: bool) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            subscriptions: Mutex::new(Vec::new()),
            exit_on_exception,
            shutdown: Arc::new(AtomicBool::new(false)),
            clock,
        }
    }

    /// Register `handler`, invoked only when every predicate in
    /// `predicates` returns true for the incoming event.
    pub fn subscribe(&self, handler: Arc<dyn Handler>, predicates: Vec<Predicate>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscriptions.lock().push((id, Subscription { handler, predicates }));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.lock().retain(|(sub_id, _)| *sub_id != id);
    }

    /// Stamp `time`/`created` (if unset) and enqueue. Never blocks.
    pub fn dispatch(&self, mut event: Event) {
        if event.time == 0.0 {
            event.time = self.clock.monotonic_secs();
        }
        // An unbounded sender only errors once every receiver is dropped,
        // which happens only after `notify()` has returned for good.
        let _ = self.sender.send(event);
    }

    /// Request the drain loop stop once the queue is empty.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.dispatch(Event::new("bus", mtx_core::kinds::SHUTDOWN, serde_json::json!({})));
    }

    /// The single drain loop. Removes events in FIFO order, snapshots the
    /// current subscription set for each, and invokes every handler whose
    /// predicates all match. Must be called by exactly one task; calling it
    /// twice concurrently panics.
    ///
    /// If `until_complete` is set, the loop never waits for new events: it
    /// drains whatever is currently queued and returns as soon as the queue
    /// is empty, independent of `shutdown()`. Otherwise it blocks for new
    /// events until `shutdown()` has been called and the queue is empty.
    pub async fn notify(&self, until_complete: bool) {
        let mut receiver =
            self.receiver.lock().take().expect("Bus::notify called more than once concurrently");

        loop {
            let event = if until_complete {
                match receiver.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                }
            } else {
                match receiver.recv().await {
                    Some(event) => event,
                    None => break,
                }
            };

            if !self.deliver(&event).await {
                break;
            }

            if !until_complete && self.shutdown.load(Ordering::Acquire) && receiver.is_empty() {
                break;
            }
        }

        *self.receiver.lock() = Some(receiver);
    }

    /// Deliver one event to every matching subscriber. Returns `false` if a
    /// handler errored and the bus is in exit-on-exception mode.
    async fn deliver(&self, event: &Event) -> bool {
        let snapshot: Vec<(SubscriptionId, Arc<dyn Handler>)> = {
            let subs = self.subscriptions.lock();
            subs.iter()
                .filter(|(_, sub)| sub.predicates.iter().all(|p| p(event)))
                .map(|(id, sub)| (*id, sub.handler.clone()))
                .collect()
        };

        for (_, handler) in snapshot {
            if let Err(err) = handler.handle(event).await {
                self.on_handler_error(event, &err);
                if self.exit_on_exception {
                    return false;
                }
            }
        }
        true
    }

    fn on_handler_error(&self, event: &Event, err: &HandlerError) {
        tracing::warn!(event = %event, error = %err, "bus subscriber handler failed");
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
