// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only `TaskContext` double, shared by the `task` submodule's tests.

use crate::cluster::fake::FakeClusterModel;
use crate::task::TaskContext;
use mtx_core::{ClusterModel, Config, Event, Suite};
use parking_lot::Mutex;
use std::collections::HashMap;

pub struct FakeTaskContext {
    pub cluster: FakeClusterModel,
    pub config: Config,
    pub suite: Suite,
    states: Mutex<HashMap<String, String>>,
    dispatched: Mutex<Vec<Event>>,
}

impl FakeTaskContext {
    pub fn new() -> Self {
        Self {
            cluster: FakeClusterModel::empty(),
            config: Config::default(),
            suite: Suite::default(),
            states: Mutex::new(HashMap::new()),
            dispatched: Mutex::new(Vec::new()),
        }
    }

    pub fn with_cluster(mut self, cluster: FakeClusterModel) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn dispatched(&self) -> Vec<Event> {
        self.dispatched.lock().clone()
    }
}

impl Default for FakeTaskContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TaskContext for FakeTaskContext {
    fn get_state(&self, name: &str) -> Option<String> {
        self.states.lock().get(name).cloned()
    }

    fn states(&self) -> HashMap<String, String> {
        self.states.lock().clone()
    }

    fn set_state(&self, name: &str, value: &str) {
        self.states.lock().insert(name.to_string(), value.to_string());
    }

    fn dispatch(&self, event: Event) {
        self.dispatched.lock().push(event);
    }

    fn cluster(&self) -> &dyn ClusterModel {
        &self.cluster
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn suite(&self) -> &Suite {
        &self.suite
    }

    fn timeline(&self) -> Vec<Event> {
        self.dispatched()
    }
}
