// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

fn parse(argv: &[&str]) -> Args {
    let mut full = vec!["matrix-engine"];
    full.extend_from_slice(argv);
    Args::parse_from(full)
}

#[test]
fn defaults_match_spec() {
    let args = parse(&[]);
    assert_eq!(args.path, PathBuf::from("."));
    assert_eq!(args.log_level, "info");
    assert_eq!(args.log_name, "matrix");
    assert_eq!(args.skin, Skin::Raw);
    assert_eq!(args.interval, 5);
    assert_eq!(args.chaos_num, 3);
    assert_eq!(args.chaos_output, "chaos_plan_{model}.yaml");
    assert!(!args.fail_fast);
    assert!(!args.disable_builtin_suite);
    assert!(!args.disable_bundle_suite);
    assert!(!args.ha);
}

#[test]
fn short_flags_all_map_to_the_right_field() {
    let args = parse(&[
        "-p", "/bundle",
        "-c", "kubernetes",
        "-m", "model-1",
        "-C", "aws",
        "-M", "ci-",
        "-k",
        "-l", "debug",
        "-L", "myrun",
        "-f", "mtx_engine=trace",
        "-d", "/out",
        "-s", "tui",
        "-x", "/out/report.xml",
        "-F",
        "-i", "1",
        "-D",
        "-B",
        "-t", "deploy-*",
        "-g", "/out/plan.yaml",
        "-n", "5",
        "-o", "plan_{model}.yaml",
        "-H",
    ]);

    assert_eq!(args.path, PathBuf::from("/bundle"));
    assert_eq!(args.controller, Some("kubernetes".to_string()));
    assert_eq!(args.model, Some("model-1".to_string()));
    assert_eq!(args.cloud, Some("aws".to_string()));
    assert_eq!(args.model_prefix, Some("ci-".to_string()));
    assert!(args.keep_models);
    assert_eq!(args.log_level, "debug");
    assert_eq!(args.log_name, "myrun");
    assert_eq!(args.log_filter, Some("mtx_engine=trace".to_string()));
    assert_eq!(args.output_dir, Some(PathBuf::from("/out")));
    assert_eq!(args.skin, Skin::Tui);
    assert_eq!(args.xunit, Some(PathBuf::from("/out/report.xml")));
    assert!(args.fail_fast);
    assert_eq!(args.interval, 1);
    assert!(args.disable_builtin_suite);
    assert!(args.disable_bundle_suite);
    assert_eq!(args.test_pattern, vec!["deploy-*".to_string()]);
    assert_eq!(args.chaos_plan, Some(PathBuf::from("/out/plan.yaml")));
    assert_eq!(args.chaos_num, 5);
    assert_eq!(args.chaos_output, "plan_{model}.yaml");
    assert!(args.ha);
}

#[test]
fn positional_additional_suites_collect_in_order() {
    let args = parse(&["a.yaml", "b.yaml"]);
    assert_eq!(args.additional_suites, vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
}
