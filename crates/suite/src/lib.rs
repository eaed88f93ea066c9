// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mtx-suite: declarative suite-spec YAML parsing (spec §4.3) and the
//! built-in/bundle/additional suite loading and merge assembly (spec §6).

pub mod builtin;
pub mod loader;
pub mod spec;

pub use builtin::built_in_suite;
pub use loader::{bundle_suite_path, filter_by_patterns, load_suite_file, load_suites};
pub use spec::parse_suite;
