// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `matrix-engine`: the chaos test orchestrator CLI (spec §6).
//!
//! Wires together the pieces the other crates define: parses the
//! declarative suite(s), assembles a [`Context`], drives the suite with
//! [`Engine`], and persists the xunit report / chaos plan / log file the
//! spec calls out as this binary's external interfaces. The cluster client,
//! terminal UI and crashdump collector are the out-of-scope collaborators
//! (spec §1) — here that boundary is `ClusterModel` (fake or kube-backed)
//! and the raw skin printer standing in for the real TUI.

mod args;
mod config;
mod logging;
mod skin;

use anyhow::{Context as _, Result};
use args::{Args, Skin};
use clap::Parser;
use mtx_adapters::{ActionRegistry, FakeClusterModel, KubeClusterModel, SelectorRegistry, TaskRegistry};
use mtx_core::{ClusterModel, SystemClock};
use mtx_engine::chaos::register_chaos_task;
use mtx_engine::logging::subscribe_logging_bridge;
use mtx_engine::xunit::XunitCollector;
use mtx_engine::{Context, CrashdumpCollector, Engine, NoopCrashdumpCollector};
use std::sync::Arc;

const EXIT_PARSE_ERROR: i32 = 1;
const EXIT_MODEL_CREATE_ERROR: i32 = 200;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::build_config(&args);

    let _log_guard = logging::init(&config, &args.log_level, &args.log_name, args.log_filter.as_deref());
    if args.skin == Skin::Tui {
        tracing::warn!("--skin tui requested but the terminal UI is an external collaborator this binary doesn't ship; falling back to raw");
    }

    let exit_code = run(args, config).await?;
    std::process::exit(exit_code)
}

async fn run(args: Args, config: mtx_core::Config) -> Result<i32> {
    let suite = match mtx_suite::load_suites(&config) {
        Ok(suite) => suite,
        Err(e) => {
            tracing::error!(error = %e, "failed to load suite");
            return Ok(EXIT_PARSE_ERROR);
        }
    };

    let cluster: Arc<dyn ClusterModel> = match build_cluster(&config).await {
        Ok(cluster) => cluster,
        Err(e) => {
            tracing::error!(error = %e, "failed to create cluster model");
            return Ok(EXIT_MODEL_CREATE_ERROR);
        }
    };

    let bus = Arc::new(mtx_bus::Bus::new(SystemClock::new(), false));
    let bus_task = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(false).await }
    });

    subscribe_logging_bridge(&*bus);
    skin::subscribe_raw_skin(&*bus);

    let entity = config.model.clone().unwrap_or_else(|| "unnamed".to_string());
    let xunit = args.xunit.as_ref().map(|_| XunitCollector::subscribe(&*bus, entity));

    let mut task_registry = TaskRegistry::new();
    register_chaos_task(&mut task_registry, SelectorRegistry::new(), ActionRegistry::new());

    let ctx = Context::new(bus.clone(), cluster, config.clone(), suite.clone(), task_registry);

    let crashdump: Arc<dyn CrashdumpCollector> = Arc::new(NoopCrashdumpCollector);
    let report = Engine::new(ctx, suite).with_crashdump_collector(crashdump).run().await;

    if let (Some(xunit), Some(path)) = (&xunit, &args.xunit) {
        if let Err(e) = xunit.write(path) {
            tracing::warn!(error = %e, path = %path.display(), "failed writing xunit report");
        }
    }

    if let Some(output_dir) = &config.output_dir {
        if let Err(e) = logging::compress_log(output_dir, &args.log_name) {
            tracing::warn!(error = %e, "failed compressing log file");
        }
    }

    bus.shutdown();
    let _ = bus_task.await;

    for outcome in &report.outcomes {
        tracing::info!(test = %outcome.test, success = outcome.success, exit_code = outcome.exit_code, "test finished");
    }

    Ok(report.exit_code)
}

/// Build the `ClusterModel` a run drives against (spec §1's out-of-scope
/// cluster client, reached only through this trait boundary): `kubernetes`
/// (or any `--controller` value, since this engine's only real adapter
/// targets Kubernetes) connects to a live cluster; no controller and no
/// model name falls back to the in-memory fake, matching a bundle-less dry
/// run.
async fn build_cluster(config: &mtx_core::Config) -> Result<Arc<dyn ClusterModel>> {
    match &config.controller {
        Some(_) => {
            let client = kube::Client::try_default().await.context("connecting to kubernetes controller")?;
            let namespace = config.model.clone().unwrap_or_else(|| "default".to_string());
            Ok(Arc::new(KubeClusterModel::new(client, namespace)))
        }
        None => Ok(Arc::new(FakeClusterModel::empty())),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
