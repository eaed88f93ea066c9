// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task resolution (spec §4.2): name -> in-process handler or filesystem
//! path. Per spec §9's redesign note, dynamic dotted-identifier code loading
//! is replaced by a fixed registry built at startup; only the subprocess
//! path remains open to operator-supplied commands.

use crate::task::builtin;
use crate::task::TaskHandler;
use mtx_core::{Config, ResolutionError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// What a task name resolved to (spec §4.2).
#[derive(Clone)]
pub enum Resolved {
    InProcess(Arc<dyn TaskHandler>),
    Process(PathBuf),
}

/// The fixed in-process task registry, keyed by both a task's short name
/// (`"deploy"`) and its full dotted command (`"tasks.deploy"`), so either
/// spelling in a rule's `do:` clause resolves to the same handler.
pub struct TaskRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
}

impl TaskRegistry {
    /// Builds the registry with every built-in task this crate can supply
    /// on its own (spec §4.2 SUPPLEMENT). `tasks.chaos` is *not* registered
    /// here: the chaos planner (spec §4.6) is assembled in `mtx-engine`
    /// (which depends on this crate for the selector/action registries), so
    /// `mtx-engine` registers it after constructing this registry — see
    /// `mtx_engine::chaos::register_chaos_task`.
    pub fn new() -> Self {
        let mut registry = Self { handlers: HashMap::new() };
        registry.register("tasks.deploy", Arc::new(builtin::Deploy));
        registry.register("tasks.health", Arc::new(builtin::Health));
        registry.register("tasks.reset", Arc::new(builtin::Reset));
        registry.register("tasks.fail", Arc::new(builtin::Fail));
        registry
    }

    /// Register a handler under `full_name` and its short (post-last-dot)
    /// name.
    pub fn register(&mut self, full_name: &str, handler: Arc<dyn TaskHandler>) {
        let short = short_name(full_name);
        self.handlers.insert(short.to_string(), handler.clone());
        self.handlers.insert(full_name.to_string(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TaskHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Resolve a task's `command` to either a registered in-process handler
    /// or a filesystem path (spec §4.2 resolution order).
    ///
    /// Step 1 of spec §4.2 ("lookup in the context's task cache") is the
    /// registry lookup itself: built-ins are registered at startup, so
    /// checking the registry first *is* the cache check. Step 3's
    /// dotted-identifier lookup resolves into this same fixed registry
    /// rather than a dynamic module loader.
    pub fn resolve(&self, command: &str, config: &Config) -> Result<Resolved, ResolutionError> {
        if let Some(handler) = self.get(command) {
            return Ok(Resolved::InProcess(handler));
        }

        for candidate in [PathBuf::from(command), config.path.join(command)] {
            if candidate.exists() {
                return Ok(Resolved::Process(candidate));
            }
        }

        Err(ResolutionError::NotFound(command.to_string()))
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn short_name(command: &str) -> &str {
    match command.rsplit_once('.') {
        Some((_, short)) => short,
        None => command,
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
