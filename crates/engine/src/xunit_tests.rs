// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mtx_core::FakeClock;

async fn drive(bus: Arc<Bus<FakeClock>>, events: Vec<Event>) {
    let bus_task = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(false).await }
    });
    for event in events {
        bus.dispatch(event);
    }
    bus.shutdown();
    let _ = bus_task.await;
}

#[tokio::test]
async fn successful_test_produces_one_passing_testcase() {
    let bus = Arc::new(Bus::new(FakeClock::new(), false));
    let collector = XunitCollector::subscribe(&*bus, "matrix-model");

    drive(
        bus,
        vec![
            Event::test_start("smoke"),
            Event::rule_done("deploy", true),
            Event::test_complete("smoke", true),
        ],
    )
    .await;

    let state = collector.state.lock();
    assert_eq!(state.testcases.len(), 1);
    assert_eq!(state.testcases[0].name, "matrix-model: smoke");
    assert!(state.testcases[0].failure.is_none());
}

#[tokio::test]
async fn failed_rule_surfaces_as_a_failure_element() {
    let bus = Arc::new(Bus::new(FakeClock::new(), false));
    let collector = XunitCollector::subscribe(&*bus, "matrix-model");

    drive(
        bus,
        vec![
            Event::test_start("gating"),
            Event::rule_done("fail", false),
            Event::test_complete("gating", false),
        ],
    )
    .await;

    let state = collector.state.lock();
    assert_eq!(state.testcases.len(), 1);
    let failure = state.testcases[0].failure.as_ref().expect("expected a failure element");
    assert!(failure.message.contains("fail"));
}

#[tokio::test]
async fn write_serializes_expected_testsuite_shape() {
    let bus = Arc::new(Bus::new(FakeClock::new(), false));
    let collector = XunitCollector::subscribe(&*bus, "matrix-model");

    drive(
        bus,
        vec![
            Event::test_start("smoke"),
            Event::test_complete("smoke", true),
            Event::test_start("gating"),
            Event::rule_done("fail", false),
            Event::test_complete("gating", false),
        ],
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xml");
    collector.write(&path).unwrap();

    let xml = std::fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<testsuites>"));
    assert!(xml.contains(r#"name="matrix""#));
    assert!(xml.contains(r#"tests="2""#));
    assert!(xml.contains(r#"tests="2""#));
    assert!(xml.contains(r#"failures="1""#));
    assert!(xml.contains("matrix-model: smoke"));
    assert!(xml.contains("matrix-model: gating"));
}
