// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `KubeClusterModel`: a `ClusterModel` backed by a real Kubernetes cluster
//! via `kube`/`k8s-openapi` — the closest stand-in available in a Rust
//! workspace for "a live cluster" (spec §1's out-of-scope cluster client,
//! reached only through the `ClusterModel` trait boundary). Machines map to
//! Nodes, units to Pods, and applications to Pods grouped by
//! [`APP_LABEL`].
//!
//! Deploy/connect/destroy mechanics are themselves the out-of-scope
//! collaborator (spec §1): `deploy` only confirms the API server is
//! reachable and `destroy` is a deliberate no-op, on the assumption that the
//! workload under test is deployed and torn down by whatever out-of-scope
//! tooling owns the bundle, not by this engine.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams};
use kube::Client;
use mtx_core::{
    AgentStatus, Application, ApplicationId, ClusterModel, InfraFailure, Machine, MachineId, Unit, UnitId,
    WorkloadStatus,
};

/// The recommended Kubernetes label this adapter groups Pods into
/// applications by.
pub const APP_LABEL: &str = "app.kubernetes.io/name";

pub struct KubeClusterModel {
    client: Client,
    namespace: String,
}

impl KubeClusterModel {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self { client, namespace: namespace.into() }
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn nodes(&self) -> Api<Node> {
        Api::all(self.client.clone())
    }

    fn deployments(&self) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn map_pod(&self, pod: &Pod) -> Option<Unit> {
        let name = pod.metadata.name.as_deref()?;
        let app_name = pod.metadata.labels.as_ref()?.get(APP_LABEL)?.clone();
        let node_name = pod.spec.as_ref().and_then(|s| s.node_name.clone()).unwrap_or_default();
        let is_leader = pod
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get("matrix.leader"))
            .is_some_and(|v| v == "true");
        let subordinate = pod
            .metadata
            .labels
            .as_ref()
            .and_then(|l| l.get("matrix.subordinate"))
            .is_some_and(|v| v == "true");

        let ready = pod
            .status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .is_some_and(|cs| cs.iter().any(|c| c.type_ == "Ready" && c.status == "True"));
        let phase = pod.status.as_ref().and_then(|s| s.phase.as_deref()).unwrap_or("Unknown");
        let workload_status = match phase {
            "Running" if ready => WorkloadStatus::Active,
            "Running" => WorkloadStatus::Waiting,
            "Pending" => WorkloadStatus::Waiting,
            "Succeeded" => WorkloadStatus::Maintenance,
            "Failed" => WorkloadStatus::Error,
            _ => WorkloadStatus::Unknown,
        };
        let agent_status = if workload_status == WorkloadStatus::Error {
            AgentStatus::Error
        } else if ready {
            AgentStatus::Idle
        } else {
            AgentStatus::Executing
        };

        Some(Unit {
            id: UnitId::from_string(name),
            application: ApplicationId::from_string(&app_name),
            machine: MachineId::from_string(&node_name),
            is_leader,
            subordinate,
            agent_status,
            workload_status,
        })
    }
}

#[async_trait]
impl ClusterModel for KubeClusterModel {
    async fn deploy(&self) -> Result<(), InfraFailure> {
        self.client
            .apiserver_version()
            .await
            .map(|_| ())
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))
    }

    async fn destroy(&self) -> Result<(), InfraFailure> {
        Ok(())
    }

    async fn machines(&self) -> Result<Vec<Machine>, InfraFailure> {
        let list = self
            .nodes()
            .list(&ListParams::default())
            .await
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))?;
        Ok(list
            .into_iter()
            .filter_map(|node| {
                let name = node.metadata.name?;
                let series = node
                    .status
                    .and_then(|s| s.node_info)
                    .map(|info| info.os_image)
                    .unwrap_or_default();
                Some(Machine { id: MachineId::from_string(&name), series })
            })
            .collect())
    }

    async fn units(&self, application: Option<&ApplicationId>) -> Result<Vec<Unit>, InfraFailure> {
        let list = self
            .pods()
            .list(&ListParams::default())
            .await
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))?;
        Ok(list
            .iter()
            .filter_map(|pod| self.map_pod(pod))
            .filter(|unit| match application {
                Some(app) => &unit.application == app,
                None => true,
            })
            .collect())
    }

    async fn applications(&self) -> Result<Vec<Application>, InfraFailure> {
        let list = self
            .pods()
            .list(&ListParams::default())
            .await
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))?;
        let mut names: Vec<String> = list
            .iter()
            .filter_map(|pod| pod.metadata.labels.as_ref()?.get(APP_LABEL).cloned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names
            .into_iter()
            .map(|name| Application { id: ApplicationId::from_string(&name), name, dead: false })
            .collect())
    }

    async fn reboot(&self, unit: &UnitId) -> Result<(), InfraFailure> {
        self.pods()
            .delete(unit.as_str(), &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))
    }

    async fn kill_agent(&self, unit: &UnitId) -> Result<(), InfraFailure> {
        self.pods()
            .delete(unit.as_str(), &DeleteParams { grace_period_seconds: Some(0), ..DeleteParams::default() })
            .await
            .map(|_| ())
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))
    }

    async fn destroy_machine(&self, machine: &MachineId) -> Result<(), InfraFailure> {
        self.nodes()
            .delete(machine.as_str(), &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))
    }

    async fn remove_unit(&self, unit: &UnitId) -> Result<(), InfraFailure> {
        self.pods()
            .delete(unit.as_str(), &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))
    }

    async fn add_unit(&self, application: &ApplicationId) -> Result<(), InfraFailure> {
        let deployments = self.deployments();
        let scale = deployments
            .get_scale(application.as_str())
            .await
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))?;
        let current = scale.spec.and_then(|s| s.replicas).unwrap_or(0);
        let patch = serde_json::json!({ "spec": { "replicas": current + 1 } });
        deployments
            .patch_scale(application.as_str(), &PatchParams::default(), &Patch::Merge(patch))
            .await
            .map(|_| ())
            .map_err(|e| InfraFailure::ControllerUnreachable(e.to_string()))
    }

    async fn all_units_idle(&self) -> Result<bool, InfraFailure> {
        Ok(self.units(None).await?.iter().all(|u| u.agent_status == AgentStatus::Idle))
    }

    async fn resolve_application(&self, name: &str) -> Result<Application, InfraFailure> {
        self.applications()
            .await?
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| InfraFailure::ControllerUnreachable(format!("no such application: {name}")))
    }
}
