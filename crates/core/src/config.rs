// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration (spec §6) and the `should_gate` resolution.

use crate::task::Task;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// `--path, -p`: local bundle directory.
    pub path: PathBuf,
    pub controller: Option<String>,
    pub model: Option<String>,
    pub cloud: Option<String>,
    pub model_prefix: Option<String>,
    pub keep_models: bool,
    pub output_dir: Option<PathBuf>,
    pub xunit: Option<PathBuf>,
    pub fail_fast: bool,
    /// `--interval, -i`: rule-entry poll period (default 5s).
    pub interval: Duration,
    pub disable_builtin_suite: bool,
    pub disable_bundle_suite: bool,
    pub additional_suites: Vec<PathBuf>,
    pub test_patterns: Vec<String>,
    pub chaos_plan: Option<PathBuf>,
    pub chaos_num: u32,
    pub chaos_output: String,
    /// `--ha, -H`: marks the bundle as HA; affects `should_gate` for
    /// `ha_only` tasks.
    pub ha: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            controller: None,
            model: None,
            cloud: None,
            model_prefix: None,
            keep_models: false,
            output_dir: None,
            xunit: None,
            fail_fast: false,
            interval: Duration::from_secs(5),
            disable_builtin_suite: false,
            disable_bundle_suite: false,
            additional_suites: Vec::new(),
            test_patterns: Vec::new(),
            chaos_plan: None,
            chaos_num: 3,
            chaos_output: "chaos_plan_{model}.yaml".to_string(),
            ha: false,
        }
    }
}

impl Config {
    /// Whether a task's failure should gate the test (spec §3 SUPPLEMENT,
    /// resolving the `--ha`/`ha_only` ambiguity spec.md names but never
    /// defines): `task.gating` must be true, and if the task declares
    /// `args.ha_only = true`, gating additionally requires `config.ha`.
    pub fn should_gate(&self, task: &Task) -> bool {
        if !task.gating {
            return false;
        }
        match task.arg_bool("ha_only") {
            Some(true) => self.ha,
            _ => true,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
