// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID types for cluster objects addressed by the chaos planner (§4.6).

crate::define_id! {
    /// Identifies a machine (bare-metal host or VM) in the cluster model.
    pub struct MachineId("mach-");
}

crate::define_id! {
    /// Identifies a unit (a running instance of an application) in the cluster model.
    pub struct UnitId("unit-");
}

crate::define_id! {
    /// Identifies an application (a deployed workload) in the cluster model.
    pub struct ApplicationId("app-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
