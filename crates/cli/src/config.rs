// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles an [`mtx_core::Config`] from parsed CLI arguments and the
//! `MATRIX_OUTPUT_DIR`/`MATRIX_MODEL_PREFIX` environment overrides (spec
//! §6).

use crate::args::Args;
use mtx_core::Config;
use std::path::PathBuf;
use std::time::Duration;

pub fn build_config(args: &Args) -> Config {
    let output_dir = std::env::var("MATRIX_OUTPUT_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| args.output_dir.clone());

    let model_prefix = std::env::var("MATRIX_MODEL_PREFIX").ok().or_else(|| args.model_prefix.clone());

    Config {
        path: args.path.clone(),
        controller: args.controller.clone(),
        model: args.model.clone(),
        cloud: args.cloud.clone(),
        model_prefix,
        keep_models: args.keep_models,
        output_dir,
        xunit: args.xunit.clone(),
        fail_fast: args.fail_fast,
        interval: Duration::from_secs(args.interval),
        disable_builtin_suite: args.disable_builtin_suite,
        disable_bundle_suite: args.disable_bundle_suite,
        additional_suites: args.additional_suites.clone(),
        test_patterns: args.test_pattern.clone(),
        chaos_plan: args.chaos_plan.clone(),
        chaos_num: args.chaos_num,
        chaos_output: args.chaos_output.clone(),
        ha: args.ha,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
