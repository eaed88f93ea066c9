// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in chaos selectors (spec §4.6/H), grounded in
//! `original_source/matrix/tasks/chaos/selectors.py`. A selector chain
//! starts with the upstream object list empty and threads its output to
//! the next selector (spec §4.6 step 2); this crate only defines the
//! callables, the chain-walking loop lives in `mtx-engine::chaos`.

use async_trait::async_trait;
use mtx_core::{Application, ClusterModel, ClusterObject, InfraFailure};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;

/// A kwarg value after the chain-evaluation resolution step (spec §4.6 step
/// 2): string values that name a cluster application are resolved to the
/// live `Application` via the pluggable resolver; everything else passes
/// through as raw JSON.
#[derive(Debug, Clone)]
pub enum ResolvedArg {
    Json(serde_json::Value),
    Application(Application),
}

impl ResolvedArg {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Json(v) => v.as_bool(),
            Self::Application(_) => None,
        }
    }

    pub fn as_application(&self) -> Option<&Application> {
        match self {
            Self::Application(app) => Some(app),
            Self::Json(_) => None,
        }
    }
}

pub type ResolvedKwArgs = HashMap<String, ResolvedArg>;

/// A function producing a subset of cluster objects from an upstream set
/// and named parameters (spec §4.6/H).
#[async_trait]
pub trait Selector: Send + Sync {
    async fn select(
        &self,
        model: &dyn ClusterModel,
        upstream: &[ClusterObject],
        kwargs: &ResolvedKwArgs,
    ) -> Result<Vec<ClusterObject>, InfraFailure>;
}

/// `machines` (spec §4.6 implicit `machine -> [machines, one]`).
pub struct Machines;

#[async_trait]
impl Selector for Machines {
    async fn select(
        &self,
        model: &dyn ClusterModel,
        _upstream: &[ClusterObject],
        _kwargs: &ResolvedKwArgs,
    ) -> Result<Vec<ClusterObject>, InfraFailure> {
        Ok(model.machines().await?.into_iter().map(ClusterObject::Machine).collect())
    }
}

/// `units(application?)` (spec §4.6 implicit `unit -> [units(application=a), ...]`).
pub struct Units;

#[async_trait]
impl Selector for Units {
    async fn select(
        &self,
        model: &dyn ClusterModel,
        _upstream: &[ClusterObject],
        kwargs: &ResolvedKwArgs,
    ) -> Result<Vec<ClusterObject>, InfraFailure> {
        let application = kwargs.get("application").and_then(ResolvedArg::as_application).map(|a| a.id.clone());
        Ok(model.units(application.as_ref()).await?.into_iter().map(ClusterObject::Unit).collect())
    }
}

/// `applications` (spec §4.6 implicit `application -> [applications, one]`).
pub struct Applications;

#[async_trait]
impl Selector for Applications {
    async fn select(
        &self,
        model: &dyn ClusterModel,
        _upstream: &[ClusterObject],
        _kwargs: &ResolvedKwArgs,
    ) -> Result<Vec<ClusterObject>, InfraFailure> {
        Ok(model.applications().await?.into_iter().map(ClusterObject::Application).collect())
    }
}

/// Filters upstream units by `is_leader == kwargs["value"]` (spec §4.6's
/// implicit `leader(value=isLeader)` shape). Defaults to `true` when the
/// kwarg is absent or not a bool.
pub struct Leader;

#[async_trait]
impl Selector for Leader {
    async fn select(
        &self,
        _model: &dyn ClusterModel,
        upstream: &[ClusterObject],
        kwargs: &ResolvedKwArgs,
    ) -> Result<Vec<ClusterObject>, InfraFailure> {
        let want = kwargs.get("value").and_then(ResolvedArg::as_bool).unwrap_or(true);
        Ok(upstream.iter().filter(|o| matches!(o, ClusterObject::Unit(u) if u.is_leader == want)).cloned().collect())
    }
}

/// Picks one random object from upstream (spec §4.6's terminal `one`
/// selector closing every implicit chain). An empty upstream yields an
/// empty output, which short-circuits the remaining chain and the action
/// (spec §4.6 step 2, §7's `NoObjects`).
pub struct One;

#[async_trait]
impl Selector for One {
    async fn select(
        &self,
        _model: &dyn ClusterModel,
        upstream: &[ClusterObject],
        _kwargs: &ResolvedKwArgs,
    ) -> Result<Vec<ClusterObject>, InfraFailure> {
        Ok(upstream.choose(&mut rand::thread_rng()).cloned().into_iter().collect())
    }
}

/// Name -> [`Selector`] map (spec §4.6/H: "a selector descriptor is just
/// the callable").
pub struct SelectorRegistry {
    selectors: HashMap<String, Arc<dyn Selector>>,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        let mut registry = Self { selectors: HashMap::new() };
        registry.register("machines", Arc::new(Machines));
        registry.register("units", Arc::new(Units));
        registry.register("applications", Arc::new(Applications));
        registry.register("leader", Arc::new(Leader));
        registry.register("one", Arc::new(One));
        registry
    }

    pub fn register(&mut self, name: &str, selector: Arc<dyn Selector>) {
        self.selectors.insert(name.to_string(), selector);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Selector>> {
        self.selectors.get(name).cloned()
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "selectors_tests.rs"]
mod tests;
