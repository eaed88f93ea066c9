// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FakeClusterModel`: an in-memory `ClusterModel` used by tests and by
//! operators running without a real backend (spec §9 "Context as shared
//! mutable root" grounding: the teacher's `FakeAdapter` split).

use async_trait::async_trait;
use mtx_core::{
    AgentStatus, Application, ApplicationId, ClusterModel, InfraFailure, Machine, MachineId, Unit, UnitId,
    WorkloadStatus,
};
use parking_lot::Mutex;

#[derive(Debug, Clone)]
struct FakeState {
    machines: Vec<Machine>,
    units: Vec<Unit>,
    applications: Vec<Application>,
    idle: bool,
    deployed: bool,
}

pub struct FakeClusterModel {
    state: Mutex<FakeState>,
}

impl FakeClusterModel {
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(FakeState { machines: Vec::new(), units: Vec::new(), applications: Vec::new(), idle: true, deployed: false }),
        }
    }

    /// Add an application with `unit_count` units, one per fresh machine,
    /// the first unit marked leader.
    pub fn with_application(self, name: &str, unit_count: usize) -> Self {
        let mut state = self.state.lock();
        let app = Application { id: ApplicationId::new(), name: name.to_string(), dead: false };
        for i in 0..unit_count {
            let machine = Machine { id: MachineId::new(), series: "jammy".to_string() };
            let unit = Unit {
                id: UnitId::new(),
                application: app.id.clone(),
                machine: machine.id.clone(),
                is_leader: i == 0,
                subordinate: false,
                agent_status: AgentStatus::Idle,
                workload_status: WorkloadStatus::Active,
            };
            state.machines.push(machine);
            state.units.push(unit);
        }
        state.applications.push(app);
        drop(state);
        self
    }

    pub fn set_idle(&self, idle: bool) {
        self.state.lock().idle = idle;
    }

    pub fn set_unit_status(&self, unit: &UnitId, agent: AgentStatus, workload: WorkloadStatus) {
        let mut state = self.state.lock();
        if let Some(u) = state.units.iter_mut().find(|u| &u.id == unit) {
            u.agent_status = agent;
            u.workload_status = workload;
        }
    }
}

impl Default for FakeClusterModel {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl ClusterModel for FakeClusterModel {
    async fn deploy(&self) -> Result<(), InfraFailure> {
        self.state.lock().deployed = true;
        Ok(())
    }

    async fn destroy(&self) -> Result<(), InfraFailure> {
        let mut state = self.state.lock();
        state.deployed = false;
        state.machines.clear();
        state.units.clear();
        state.applications.clear();
        Ok(())
    }

    async fn machines(&self) -> Result<Vec<Machine>, InfraFailure> {
        Ok(self.state.lock().machines.clone())
    }

    async fn units(&self, application: Option<&ApplicationId>) -> Result<Vec<Unit>, InfraFailure> {
        let state = self.state.lock();
        Ok(match application {
            Some(app) => state.units.iter().filter(|u| &u.application == app).cloned().collect(),
            None => state.units.clone(),
        })
    }

    async fn applications(&self) -> Result<Vec<Application>, InfraFailure> {
        Ok(self.state.lock().applications.clone())
    }

    async fn reboot(&self, _unit: &UnitId) -> Result<(), InfraFailure> {
        Ok(())
    }

    async fn kill_agent(&self, unit: &UnitId) -> Result<(), InfraFailure> {
        self.set_unit_status(unit, AgentStatus::Error, WorkloadStatus::Error);
        Ok(())
    }

    async fn destroy_machine(&self, machine: &MachineId) -> Result<(), InfraFailure> {
        let mut state = self.state.lock();
        state.machines.retain(|m| &m.id != machine);
        state.units.retain(|u| &u.machine != machine);
        Ok(())
    }

    async fn remove_unit(&self, unit: &UnitId) -> Result<(), InfraFailure> {
        self.state.lock().units.retain(|u| &u.id != unit);
        Ok(())
    }

    async fn add_unit(&self, application: &ApplicationId) -> Result<(), InfraFailure> {
        let mut state = self.state.lock();
        let machine = Machine { id: MachineId::new(), series: "jammy".to_string() };
        let unit = Unit {
            id: UnitId::new(),
            application: application.clone(),
            machine: machine.id.clone(),
            is_leader: false,
            subordinate: false,
            agent_status: AgentStatus::Idle,
            workload_status: WorkloadStatus::Active,
        };
        state.machines.push(machine);
        state.units.push(unit);
        Ok(())
    }

    async fn all_units_idle(&self) -> Result<bool, InfraFailure> {
        Ok(self.state.lock().idle)
    }

    async fn resolve_application(&self, name: &str) -> Result<Application, InfraFailure> {
        self.state
            .lock()
            .applications
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| InfraFailure::ControllerUnreachable(format!("no such application: {name}")))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
