// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suite loading and merge assembly (spec §3, §4.3, §6): built-in suite,
//! bundle-provided suite, and operator-supplied additional suite files,
//! merged in that order per `Suite::merge`'s later-replaces-earlier rule,
//! then narrowed to `--test_pattern` globs if any were given.

use crate::builtin::built_in_suite;
use crate::spec::parse_suite;
use mtx_core::{Config, ParseError, Suite};
use std::path::{Path, PathBuf};

/// Read and parse one suite file.
pub fn load_suite_file(path: &Path) -> Result<Suite, ParseError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ParseError::Yaml(format!("reading {}: {e}", path.display())))?;
    parse_suite(&contents)
}

/// The conventional bundle-suite path: `tests.yaml` alongside the bundle
/// directory named by `--path`.
pub fn bundle_suite_path(config: &Config) -> PathBuf {
    config.path.join("tests.yaml")
}

/// Assemble the final suite an engine run drives, per spec §6's `-D`/`-B`/
/// `additional_suites` flags and `--test_pattern` filter.
pub fn load_suites(config: &Config) -> Result<Suite, ParseError> {
    let mut suite = Suite::default();

    if !config.disable_builtin_suite {
        suite.merge(built_in_suite()?);
    }

    if !config.disable_bundle_suite {
        let bundle_path = bundle_suite_path(config);
        if bundle_path.exists() {
            suite.merge(load_suite_file(&bundle_path)?);
        }
    }

    for extra in &config.additional_suites {
        suite.merge(load_suite_file(extra)?);
    }

    if !config.test_patterns.is_empty() {
        suite = filter_by_patterns(suite, &config.test_patterns);
    }

    Ok(suite)
}

/// Keep only tests whose name matches at least one of `patterns` (spec §6
/// `--test_pattern, -t <glob...>`).
pub fn filter_by_patterns(suite: Suite, patterns: &[String]) -> Suite {
    let compiled: Vec<glob::Pattern> =
        patterns.iter().filter_map(|p| glob::Pattern::new(p).ok()).collect();
    let tests = suite
        .tests
        .into_iter()
        .filter(|t| compiled.iter().any(|p| p.matches(&t.name)))
        .collect();
    Suite::new(tests)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
