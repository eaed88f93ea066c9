// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in chaos actions (spec §4.6/H), grounded in
//! `original_source/matrix/tasks/glitch/actions.py`. Each is a destructive
//! operation applied to one cluster object produced by a selector chain.

use async_trait::async_trait;
use mtx_core::{ClusterModel, ClusterObject, InfraFailure, KwArgs};
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Tags carried on an [`ActionDescriptor`], mirroring the original's string
/// tagging (`subordinate_okay`) on action applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    SubordinateOk,
}

/// A destructive operation applied to one selected cluster object (spec
/// §4.6/H). `kwargs` carries the planned action's `extra_args` (spec §3's
/// `...extraArgs`), unresolved — actions, unlike selectors, have no need to
/// look names up against the cluster.
#[async_trait]
pub trait Action: Send + Sync {
    async fn apply(&self, model: &dyn ClusterModel, object: &ClusterObject, kwargs: &KwArgs) -> Result<(), InfraFailure>;
}

fn type_mismatch(expected: &str, object: &ClusterObject) -> InfraFailure {
    InfraFailure::ControllerUnreachable(format!(
        "action expected a {expected} object, got a {}",
        object.object_type()
    ))
}

pub struct Reboot;

#[async_trait]
impl Action for Reboot {
    async fn apply(&self, model: &dyn ClusterModel, object: &ClusterObject, _kwargs: &KwArgs) -> Result<(), InfraFailure> {
        match object {
            ClusterObject::Unit(unit) => model.reboot(&unit.id).await,
            other => Err(type_mismatch("unit", other)),
        }
    }
}

pub struct KillAgent;

#[async_trait]
impl Action for KillAgent {
    async fn apply(&self, model: &dyn ClusterModel, object: &ClusterObject, _kwargs: &KwArgs) -> Result<(), InfraFailure> {
        match object {
            ClusterObject::Unit(unit) => model.kill_agent(&unit.id).await,
            other => Err(type_mismatch("unit", other)),
        }
    }
}

pub struct DestroyMachine;

#[async_trait]
impl Action for DestroyMachine {
    async fn apply(&self, model: &dyn ClusterModel, object: &ClusterObject, _kwargs: &KwArgs) -> Result<(), InfraFailure> {
        match object {
            ClusterObject::Machine(machine) => model.destroy_machine(&machine.id).await,
            other => Err(type_mismatch("machine", other)),
        }
    }
}

pub struct RemoveUnit;

#[async_trait]
impl Action for RemoveUnit {
    async fn apply(&self, model: &dyn ClusterModel, object: &ClusterObject, _kwargs: &KwArgs) -> Result<(), InfraFailure> {
        match object {
            ClusterObject::Unit(unit) => model.remove_unit(&unit.id).await,
            other => Err(type_mismatch("unit", other)),
        }
    }
}

pub struct AddUnit;

#[async_trait]
impl Action for AddUnit {
    async fn apply(&self, model: &dyn ClusterModel, object: &ClusterObject, _kwargs: &KwArgs) -> Result<(), InfraFailure> {
        match object {
            ClusterObject::Application(app) => model.add_unit(&app.id).await,
            other => Err(type_mismatch("application", other)),
        }
    }
}

/// A registered action: the callable, its primary object-type argument
/// (spec §4.6: "the parameter after `rule, model`"), and its tags.
pub struct ActionDescriptor {
    pub action: Arc<dyn Action>,
    pub object_type: &'static str,
    pub tags: HashSet<ActionTag>,
}

impl ActionDescriptor {
    pub fn subordinate_ok(&self) -> bool {
        self.tags.contains(&ActionTag::SubordinateOk)
    }
}

/// Name -> [`ActionDescriptor`] map (spec §4.6/H).
pub struct ActionRegistry {
    actions: HashMap<String, ActionDescriptor>,
}

impl ActionRegistry {
    /// Builds the registry with every built-in action (spec §4.6
    /// SUPPLEMENT), grounded one-to-one in `glitch/actions.py`.
    pub fn new() -> Self {
        let mut registry = Self { actions: HashMap::new() };
        registry.register("reboot", Arc::new(Reboot), "unit", [ActionTag::SubordinateOk]);
        registry.register("kill_agent", Arc::new(KillAgent), "unit", [ActionTag::SubordinateOk]);
        registry.register("destroy_machine", Arc::new(DestroyMachine), "machine", []);
        registry.register("remove_unit", Arc::new(RemoveUnit), "unit", []);
        registry.register("add_unit", Arc::new(AddUnit), "application", []);
        registry
    }

    pub fn register(
        &mut self,
        name: &str,
        action: Arc<dyn Action>,
        object_type: &'static str,
        tags: impl IntoIterator<Item = ActionTag>,
    ) {
        self.actions.insert(name.to_string(), ActionDescriptor { action, object_type, tags: tags.into_iter().collect() });
    }

    pub fn get(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
