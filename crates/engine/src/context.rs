// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context (spec §3 B): the per-run root holding the state map, timeline,
//! waiter registry, cluster handle, config, suite and task registry.
//!
//! Per §9 "Context as shared mutable root": the state map and waiter
//! registry live behind one `parking_lot::Mutex<ContextState>`, and
//! `state.change` is published **after** releasing the lock.

use async_trait::async_trait;
use mtx_adapters::task::TaskContext;
use mtx_adapters::TaskRegistry;
use mtx_bus::{Bus, FnHandler};
use mtx_core::{satisfied_wait_keys, ClusterModel, Clock, Config, Event, StateMap, Suite};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

struct ContextState {
    states: StateMap,
    timeline: Vec<Event>,
    waiters: HashMap<String, Vec<(CancellationToken, String)>>,
}

impl ContextState {
    fn new() -> Self {
        Self { states: StateMap::new(), timeline: Vec::new(), waiters: HashMap::new() }
    }
}

/// Per-run root (spec §3 B). Generic over [`Clock`] so tests can drive it
/// with a [`mtx_core::FakeClock`].
pub struct Context<C: Clock> {
    inner: Arc<Mutex<ContextState>>,
    bus: Arc<Bus<C>>,
    cluster: Arc<dyn ClusterModel>,
    config: Config,
    suite: Suite,
    task_registry: TaskRegistry,
}

impl<C: Clock> Context<C> {
    pub fn new(bus: Arc<Bus<C>>, cluster: Arc<dyn ClusterModel>, config: Config, suite: Suite, task_registry: TaskRegistry) -> Arc<Self> {
        let inner = Arc::new(Mutex::new(ContextState::new()));
        let timeline_inner = inner.clone();
        bus.subscribe(
            FnHandler::new(move |event: Event| {
                let timeline_inner = timeline_inner.clone();
                async move {
                    timeline_inner.lock().timeline.push(event);
                    Ok(())
                }
            }),
            Vec::new(),
        );
        Arc::new(Self { inner, bus, cluster, config, suite, task_registry })
    }

    pub fn bus(&self) -> &Arc<Bus<C>> {
        &self.bus
    }

    pub fn task_registry(&self) -> &TaskRegistry {
        &self.task_registry
    }

    /// `apps()` always delegates to the live cluster model (§9 open
    /// question resolution): never cached on Context.
    pub async fn apps(&self) -> Result<Vec<mtx_core::Application>, mtx_core::InfraFailure> {
        self.cluster.applications().await
    }

    /// Register a waiter under `wait_key`: cancelled the next time a state
    /// write produces that key (spec §4.5).
    pub fn register_waiter(&self, wait_key: &str, token: CancellationToken, owner: impl Into<String>) {
        self.inner.lock().waiters.entry(wait_key.to_string()).or_default().push((token, owner.into()));
    }

    /// Clear the state map and waiter registry between tests (spec §4.5).
    /// Any outstanding waiters are cancelled first so no runner is left
    /// waiting forever on a key that's about to disappear.
    pub fn clear_state_and_waiters(&self) {
        let mut inner = self.inner.lock();
        for (_, waiters) in inner.waiters.drain() {
            for (token, _owner) in waiters {
                token.cancel();
            }
        }
        inner.states.clear();
    }
}

#[async_trait]
impl<C: Clock> TaskContext for Context<C> {
    fn get_state(&self, name: &str) -> Option<String> {
        self.inner.lock().states.get(name).cloned()
    }

    fn states(&self) -> HashMap<String, String> {
        self.inner.lock().states.clone()
    }

    fn set_state(&self, name: &str, value: &str) {
        let old = {
            let mut inner = self.inner.lock();
            let old = inner.states.get(name).cloned();
            if old.as_deref() == Some(value) {
                return;
            }
            inner.states.insert(name.to_string(), value.to_string());
            old
        };

        self.bus.dispatch(Event::state_change(name, old.as_deref(), value));

        let cancelled: Vec<CancellationToken> = {
            let mut inner = self.inner.lock();
            satisfied_wait_keys(name, value)
                .into_iter()
                .filter_map(|key| inner.waiters.remove(&key))
                .flatten()
                .map(|(token, _owner)| token)
                .collect()
        };
        for token in cancelled {
            token.cancel();
        }
    }

    fn dispatch(&self, event: Event) {
        self.bus.dispatch(event);
    }

    fn cluster(&self) -> &dyn ClusterModel {
        &*self.cluster
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn suite(&self) -> &Suite {
        &self.suite
    }

    fn timeline(&self) -> Vec<Event> {
        self.inner.lock().timeline.clone()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
