// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster object model: the typed view over machines, units and
//! applications that selectors and actions (§4.6/H) operate on, and the
//! `ClusterModel` trait boundary implementations plug into.
//!
//! This crate defines only the trait and the plain data types; concrete
//! implementations (`FakeClusterModel`, `KubeClusterModel`) live in
//! `mtx-adapters` since they carry the actual cluster-client dependency.

use crate::error::InfraFailure;
use crate::id::{ApplicationId, MachineId, UnitId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub series: String,
}

/// Agent (control-plane) status of a unit, per the original implementation's
/// `unit.agent_status` (spec §4.2 SUPPLEMENT, grounding `tasks/health.py`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Executing,
    Error,
}

/// Workload status of a unit, per the original's `unit.workload_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadStatus {
    Active,
    Waiting,
    Maintenance,
    Error,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub application: ApplicationId,
    pub machine: MachineId,
    pub is_leader: bool,
    /// Matches the original implementation's `subordinate_okay` tagging on
    /// principal/subordinate distinction for action applicability.
    pub subordinate: bool,
    pub agent_status: AgentStatus,
    pub workload_status: WorkloadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    /// An application being torn down (spec §4.2 SUPPLEMENT `tasks/reset.py`'s
    /// `app.dead` check that `reset` waits on).
    pub dead: bool,
}

/// The live cluster handle: deploy/connect/destroy, unit reboot, leader
/// lookup (spec §1, out-of-scope client but an in-scope trait boundary).
#[async_trait]
pub trait ClusterModel: Send + Sync {
    async fn deploy(&self) -> Result<(), InfraFailure>;
    async fn destroy(&self) -> Result<(), InfraFailure>;

    async fn machines(&self) -> Result<Vec<Machine>, InfraFailure>;
    async fn units(&self, application: Option<&ApplicationId>) -> Result<Vec<Unit>, InfraFailure>;
    async fn applications(&self) -> Result<Vec<Application>, InfraFailure>;

    async fn reboot(&self, unit: &UnitId) -> Result<(), InfraFailure>;
    async fn kill_agent(&self, unit: &UnitId) -> Result<(), InfraFailure>;
    async fn destroy_machine(&self, machine: &MachineId) -> Result<(), InfraFailure>;
    async fn remove_unit(&self, unit: &UnitId) -> Result<(), InfraFailure>;
    async fn add_unit(&self, application: &ApplicationId) -> Result<(), InfraFailure>;

    /// `true` once every unit in the model reports an idle agent status
    /// (spec §4.6: "block until the cluster reports all units idle").
    async fn all_units_idle(&self) -> Result<bool, InfraFailure>;

    /// Resolve a name used in a selector-chain kwarg (e.g. `application:
    /// "foo"`) against the live model (spec §4.6 step 2).
    async fn resolve_application(&self, name: &str) -> Result<Application, InfraFailure>;
}

/// A reference to a selected cluster object, as produced by a selector
/// chain and consumed by an action (spec §4.6/H).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterObject {
    Machine(Machine),
    Unit(Unit),
    Application(Application),
}

impl ClusterObject {
    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Machine(_) => "machine",
            Self::Unit(_) => "unit",
            Self::Application(_) => "application",
        }
    }
}

/// Extra string-keyed metadata threaded through selectors and actions in
/// addition to their typed object arguments (spec §4.6's `...extraArgs`).
pub type KwArgs = HashMap<String, serde_json::Value>;

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
