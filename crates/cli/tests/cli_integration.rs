//! Integration tests for the warehouse host.

use std::path::PathBuf;
use std::sync::Arc;

use domain::{
    DomainError, ErrorKind, MoveBatch, ReceiveBatch, RegisterBatch, ShipBatch, Warehouse,
    WarehouseCommand, WarehouseEvent,
};
use event_sink::{EventEnvelope, InMemoryEventSink, Version};
use warehouse_cli::{CliError, Config, JsonLinesSink, run, run_commands};

/// A JSON file in the temp directory, removed on drop.
struct TempJson(PathBuf);

impl TempJson {
    fn new(value: &serde_json::Value) -> Self {
        let path = std::env::temp_dir().join(format!("warehouse-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
        Self(path)
    }
}

impl Drop for TempJson {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn locations() -> Vec<WarehouseEvent> {
    vec![
        WarehouseEvent::created_location(1, "Receive"),
        WarehouseEvent::created_location(2, "Ship"),
        WarehouseEvent::created_location(3, "Assemble"),
    ]
}

fn json_of<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}

#[tokio::test]
async fn run_writes_accepted_events_as_json_lines() {
    let history = TempJson::new(&json_of(&locations()));
    let commands: Vec<WarehouseCommand> = vec![
        RegisterBatch::new("Bolts").into(),
        ReceiveBatch::new(1, 10).into(),
        ShipBatch::new(1, 99).into(),
        MoveBatch::new(1, 4, 1, 2).into(),
    ];
    let commands = TempJson::new(&json_of(&commands));
    let sink = Arc::new(JsonLinesSink::new(Vec::new()));

    let summary = run(&Config::default(), &history.0, &commands.0, sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.accepted, 3);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.final_version, Version::new(8));

    let output = Arc::into_inner(sink).unwrap().into_inner();
    let envelopes: Vec<EventEnvelope> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let types: Vec<_> = envelopes.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "RegisteredBatch",
            "AddedBatch",
            "AddedBatchToLocation",
            "RemovedBatchFromLocation",
            "AddedBatchToLocation",
        ]
    );
    assert_eq!(envelopes[0].version, Version::new(4));
}

#[tokio::test]
async fn commands_read_from_hand_written_json() {
    let history = TempJson::new(&json_of(&locations()));
    let commands = TempJson::new(&serde_json::json!([
        {"type": "CreateLocation", "data": {"name": "Store"}},
        {"type": "RegisterBatch", "data": {"name": "Aspirin", "is_pharma": true}},
        {"type": "CreateLocation", "data": {}}
    ]));
    let sink = InMemoryEventSink::new();

    let summary = run(&Config::default(), &history.0, &commands.0, sink.clone())
        .await
        .unwrap();

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(sink.events_of_type("CreatedLocation").await.len(), 1);
}

#[tokio::test]
async fn corrupt_history_is_fatal() {
    let mut events = locations();
    events.push(WarehouseEvent::created_location(1, "Again"));
    let history = TempJson::new(&json_of(&events));
    let commands = TempJson::new(&serde_json::json!([]));

    let error = run(
        &Config::default(),
        &history.0,
        &commands.0,
        InMemoryEventSink::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        error,
        CliError::Domain(DomainError::CorruptHistory { position: 3, .. })
    ));
    assert_eq!(error.exit_code(), 1);
}

#[tokio::test]
async fn missing_and_malformed_files_are_reported() {
    let commands = TempJson::new(&serde_json::json!([]));
    let missing = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));

    let error = run(&Config::default(), &missing, &commands.0, InMemoryEventSink::new())
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::Io { .. }));

    let malformed = TempJson::new(&serde_json::json!({"not": "a list"}));
    let error = run(
        &Config::default(),
        &malformed.0,
        &commands.0,
        InMemoryEventSink::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(error, CliError::Parse { .. }));
}

#[tokio::test]
async fn publish_failure_stops_the_run() {
    let sink = InMemoryEventSink::new();
    let mut warehouse = Warehouse::from_history(sink.clone(), locations()).unwrap();
    sink.set_unavailable(true);

    let error = run_commands(
        &mut warehouse,
        vec![
            ReceiveBatch::new(1, 1).into(),
            ReceiveBatch::new(2, 1).into(),
        ],
    )
    .await
    .unwrap_err();

    match error {
        CliError::Domain(error) => assert_eq!(error.kind(), ErrorKind::Publication),
        other => panic!("unexpected error: {other}"),
    }
    assert!(warehouse.is_stale());
}
