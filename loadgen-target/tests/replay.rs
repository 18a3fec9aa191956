//! End-to-end tests replaying schedules against an in-process target.

use std::time::Duration;

use loadgen::{
    HttpTarget, Outcome, ProcessParameters, RandomArrivals, Schedule, generate_schedule,
};
use loadgen_test::server::TestServer;
use tokio_util::sync::CancellationToken;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_replay_timing() {
    loadgen_test::tracing::init();
    let server = TestServer::new().await;
    let target = HttpTarget::new("127.0.0.1", server.port(), "heavywork", TIMEOUT).unwrap();
    let schedule = Schedule::from_delays(vec![0.1, 0.2, 0.05]).unwrap();

    let mut printed = Vec::new();
    let records = loadgen::run(&schedule, &target, &CancellationToken::new(), |record| {
        printed.push(record.to_string());
    })
    .await;

    assert_eq!(records.len(), 3);
    assert_eq!(server.state().counters.heavywork(), 3);
    assert_eq!(
        printed,
        vec![r#"202 {"message":"Heavy work started"}"#; 3]
    );

    for (record, expected) in records.iter().zip([0.1, 0.3, 0.35]) {
        let offset = record.offset.as_secs_f64();
        assert!(offset >= expected, "request {} sent early: {offset}", record.index);
        assert!(
            offset < expected + 0.1,
            "request {} sent late: {offset}",
            record.index
        );
        assert_eq!(record.path, "/heavywork");
    }

    // The gap between two dispatches matches the delay of the later one.
    let gap = (records[2].offset - records[1].offset).as_secs_f64();
    assert!((0.0..0.15).contains(&gap), "gap {gap}");
}

#[tokio::test]
async fn test_replay_generated_schedule() {
    let server = TestServer::new().await;
    let target = HttpTarget::new("127.0.0.1", server.port(), "lightwork", TIMEOUT).unwrap();

    let params = ProcessParameters::new(100.0, 2.0, 0.5);
    let schedule = generate_schedule(&params, &mut RandomArrivals::from_seed(1)).unwrap();
    assert!(!schedule.is_empty());

    let records = loadgen::run(&schedule, &target, &CancellationToken::new(), |_| {}).await;

    assert_eq!(records.len(), schedule.len());
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.index, index);
        assert_eq!(record.outcome.status(), Some(200));
    }

    // Light work does not count towards heavy work.
    assert_eq!(server.state().counters.heavywork(), 0);
}

#[tokio::test]
async fn test_unexpected_status_is_recorded() {
    let server = TestServer::new().await;
    let target = HttpTarget::new("127.0.0.1", server.port(), "nonexistent", TIMEOUT).unwrap();
    let schedule = Schedule::from_delays(vec![0.01, 0.01]).unwrap();

    let records = loadgen::run(&schedule, &target, &CancellationToken::new(), |_| {}).await;

    assert_eq!(records.len(), 2);
    for record in records {
        assert!(matches!(record.outcome, Outcome::Response { status: 404, .. }));
    }
}

#[tokio::test]
async fn test_cancel_stops_dispatching() {
    let server = TestServer::new().await;
    let target = HttpTarget::new("127.0.0.1", server.port(), "heavywork", TIMEOUT).unwrap();
    let schedule = Schedule::from_delays(vec![0.05, 0.05, 30.0, 0.05]).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let records = loadgen::run(&schedule, &target, &cancel, |_| {}).await;

    assert_eq!(records.len(), 2);
    assert_eq!(server.state().counters.heavywork(), 2);
}
