// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's built-in suite (spec §6 `-D`): a minimal deploy-then-health
//! smoke test, always available unless the operator disables it. Mirrors
//! spec §8 scenario 1 ("sequential gating") almost verbatim.

use crate::spec::parse_suite;
use mtx_core::{ParseError, Suite};

const BUILTIN_SUITE_YAML: &str = r#"
fmt: 1
tests:
  - name: smoke
    description: deploy the bundle, then confirm the cluster settles healthy
    rules:
      - do: tasks.deploy
      - do:
          task: tasks.health
          args:
            gating: true
        after: deploy.complete
        periodic: "30"
"#;

/// Parse the engine's built-in suite. Infallible in practice (the YAML is a
/// compile-time constant) but returns `Result` to keep the call site
/// consistent with every other suite source.
pub fn built_in_suite() -> Result<Suite, ParseError> {
    parse_suite(BUILTIN_SUITE_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_suite_parses() {
        let suite = built_in_suite().expect("built-in suite is valid");
        assert_eq!(suite.tests.len(), 1);
        assert_eq!(suite.tests[0].name, "smoke");
    }
}
