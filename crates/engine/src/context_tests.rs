// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mtx_adapters::FakeClusterModel;
use mtx_core::FakeClock;
use mtx_core::{Config, Suite};

fn new_ctx() -> (Arc<Context<FakeClock>>, Arc<Bus<FakeClock>>) {
    let clock = FakeClock::new();
    let bus = Arc::new(Bus::new(clock, false));
    let cluster: Arc<dyn ClusterModel> = Arc::new(FakeClusterModel::empty());
    let ctx = Context::new(bus.clone(), cluster, Config::default(), Suite::default(), TaskRegistry::new());
    (ctx, bus)
}

#[tokio::test]
async fn set_state_is_a_noop_when_value_is_unchanged() {
    let (ctx, bus) = new_ctx();
    ctx.set_state("health.status", "healthy");
    ctx.set_state("health.status", "healthy");
    bus.notify(true).await;

    let changes = ctx.timeline().into_iter().filter(|e| e.kind_is(mtx_core::kinds::STATE_CHANGE)).count();
    assert_eq!(changes, 1);
}

#[tokio::test]
async fn set_state_cancels_registered_waiter_on_matching_write() {
    let (ctx, _bus) = new_ctx();
    let token = CancellationToken::new();
    ctx.register_waiter("chaos.complete", token.clone(), "traffic");
    assert!(!token.is_cancelled());

    ctx.set_state("chaos", "complete");
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn bare_waiter_is_cancelled_when_write_value_is_complete() {
    let (ctx, _bus) = new_ctx();
    let token = CancellationToken::new();
    ctx.register_waiter("chaos", token.clone(), "traffic");

    ctx.set_state("chaos", "complete");
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn clear_state_and_waiters_cancels_outstanding_waiters() {
    let (ctx, _bus) = new_ctx();
    let token = CancellationToken::new();
    ctx.register_waiter("chaos.complete", token.clone(), "traffic");
    ctx.set_state("health.status", "healthy");

    ctx.clear_state_and_waiters();

    assert!(token.is_cancelled());
    assert!(ctx.get_state("health.status").is_none());
}

#[tokio::test]
async fn apps_always_delegates_to_the_live_cluster_model() {
    let clock = FakeClock::new();
    let bus = Arc::new(Bus::new(clock, false));
    let cluster = Arc::new(FakeClusterModel::empty().with_application("etcd", 1));
    let ctx = Context::new(bus, cluster, Config::default(), Suite::default(), TaskRegistry::new());

    let apps = ctx.apps().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name, "etcd");
}
