// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line argument parsing (spec §6 external interfaces).

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which output renderer drives the run (spec §6 `--skin`). The terminal UI
/// itself is an external collaborator this crate doesn't ship; `Raw` is the
/// only renderer actually implemented, `Tui` is accepted and falls back to
/// it with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Skin {
    Tui,
    Raw,
}

#[derive(Debug, Parser)]
#[command(name = "matrix-engine", about = "Chaos test orchestrator")]
pub struct Args {
    /// Local bundle directory to run tests against.
    #[arg(short = 'p', long = "path", default_value = ".")]
    pub path: PathBuf,

    /// Controller type to target (e.g. juju, kubernetes).
    #[arg(short = 'c', long = "controller")]
    pub controller: Option<String>,

    /// Existing model name to run against instead of deploying a new one.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Cloud to deploy the model to.
    #[arg(short = 'C', long = "cloud")]
    pub cloud: Option<String>,

    /// Prefix applied to generated model names.
    #[arg(short = 'M', long = "model-prefix")]
    pub model_prefix: Option<String>,

    /// Skip destroying cluster models between tests and on exit.
    #[arg(short = 'k', long = "keep-models")]
    pub keep_models: bool,

    /// Default tracing filter directive (e.g. info, debug, matrix=trace).
    #[arg(short = 'l', long = "log-level", default_value = "info")]
    pub log_level: String,

    /// File name prefix for the rotated log file (requires --output-dir).
    #[arg(short = 'L', long = "log-name", default_value = "matrix")]
    pub log_name: String,

    /// Additional `tracing_subscriber::EnvFilter` directive, layered on top
    /// of --log-level.
    #[arg(short = 'f', long = "log-filter")]
    pub log_filter: Option<String>,

    /// Directory logs, chaos plans and the xunit report are written to.
    #[arg(short = 'd', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Output renderer.
    #[arg(short = 's', long = "skin", value_enum, default_value_t = Skin::Raw)]
    pub skin: Skin,

    /// Write an xunit-format XML report to this path.
    #[arg(short = 'x', long = "xunit")]
    pub xunit: Option<PathBuf>,

    /// Stop the suite on the first gating failure.
    #[arg(short = 'F', long = "fail-fast")]
    pub fail_fast: bool,

    /// Rule-entry poll interval in seconds.
    #[arg(short = 'i', long = "interval", default_value_t = 5)]
    pub interval: u64,

    /// Disable the built-in suite.
    #[arg(short = 'D', long = "disable-builtin-suite")]
    pub disable_builtin_suite: bool,

    /// Disable the bundle-provided suite (tests.yaml).
    #[arg(short = 'B', long = "disable-bundle-suite")]
    pub disable_bundle_suite: bool,

    /// Additional suite files, merged after the built-in/bundle suites.
    pub additional_suites: Vec<PathBuf>,

    /// Only run tests whose name matches one of these glob patterns.
    #[arg(short = 't', long = "test_pattern")]
    pub test_pattern: Vec<String>,

    /// Load a chaos plan from this file instead of generating one.
    #[arg(short = 'g', long = "chaos_plan")]
    pub chaos_plan: Option<PathBuf>,

    /// Number of actions to pick when generating a chaos plan.
    #[arg(short = 'n', long = "chaos_num", default_value_t = 3)]
    pub chaos_num: u32,

    /// File name a generated chaos plan is persisted to; `{model}` is
    /// substituted with the model name.
    #[arg(short = 'o', long = "chaos_output", default_value = "chaos_plan_{model}.yaml")]
    pub chaos_output: String,

    /// Mark the bundle as deployed in HA mode (affects `ha_only` gating).
    #[arg(short = 'H', long = "ha")]
    pub ha: bool,
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
