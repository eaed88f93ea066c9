// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;
use std::sync::Mutex;

/// Serializes tests that mutate `MATRIX_OUTPUT_DIR`/`MATRIX_MODEL_PREFIX` to
/// avoid cross-test env-var races.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn parse(args: &[&str]) -> Args {
    let mut full = vec!["matrix-engine"];
    full.extend_from_slice(args);
    Args::parse_from(full)
}

#[test]
fn defaults_translate_straight_through() {
    let _lock = ENV_LOCK.lock().unwrap();
    std::env::remove_var("MATRIX_OUTPUT_DIR");
    std::env::remove_var("MATRIX_MODEL_PREFIX");

    let args = parse(&[]);
    let config = build_config(&args);

    assert_eq!(config.path, PathBuf::from("."));
    assert_eq!(config.interval, std::time::Duration::from_secs(5));
    assert!(!config.keep_models);
    assert!(!config.ha);
    assert_eq!(config.chaos_num, 3);
    assert_eq!(config.chaos_output, "chaos_plan_{model}.yaml");
}

#[test]
fn output_dir_env_override_wins_over_flag() {
    let _lock = ENV_LOCK.lock().unwrap();
    std::env::set_var("MATRIX_OUTPUT_DIR", "/from/env");

    let args = parse(&["--output-dir", "/from/flag"]);
    let config = build_config(&args);

    assert_eq!(config.output_dir, Some(PathBuf::from("/from/env")));
    std::env::remove_var("MATRIX_OUTPUT_DIR");
}

#[test]
fn model_prefix_falls_back_to_flag_without_env() {
    let _lock = ENV_LOCK.lock().unwrap();
    std::env::remove_var("MATRIX_MODEL_PREFIX");

    let args = parse(&["--model-prefix", "ci-run"]);
    let config = build_config(&args);

    assert_eq!(config.model_prefix, Some("ci-run".to_string()));
}

#[test]
fn test_patterns_and_additional_suites_pass_through() {
    let _lock = ENV_LOCK.lock().unwrap();
    std::env::remove_var("MATRIX_OUTPUT_DIR");
    std::env::remove_var("MATRIX_MODEL_PREFIX");

    let args = parse(&["-t", "deploy-*", "-t", "chaos-*", "extra1.yaml", "extra2.yaml"]);
    let config = build_config(&args);

    assert_eq!(config.test_patterns, vec!["deploy-*".to_string(), "chaos-*".to_string()]);
    assert_eq!(config.additional_suites, vec![PathBuf::from("extra1.yaml"), PathBuf::from("extra2.yaml")]);
}
