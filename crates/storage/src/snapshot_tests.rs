use super::*;
use crate::state::MaterializedState;
use qmon_core::{AgentId, Event};
use tempfile::tempdir;

#[test]
fn write_then_read_round_trips_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let mut state = MaterializedState::default();
    state.apply_event(
        1,
        &Event::MessagePut {
            id: "m1".into(),
            agent: AgentId::parse("bot").unwrap(),
            sender: AgentId::parse("alice").unwrap(),
            content: "hi".into(),
            enqueued_at_ms: 1,
        },
    );

    write(&path, &state).unwrap();
    let registry = MigrationRegistry::new();
    let loaded = read(&path, &registry).unwrap().unwrap();

    assert_eq!(loaded.applied_seq, 1);
    assert_eq!(loaded.messages.count_pending(&AgentId::parse("bot").unwrap()), 1);
}

#[test]
fn reading_a_missing_file_returns_none() {
    let dir = tempdir().unwrap();
    let registry = MigrationRegistry::new();
    let result = read(dir.path().join("nope.json"), &registry).unwrap();
    assert!(result.is_none());
}

#[test]
fn written_snapshot_carries_the_current_version_tag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write(&path, &MaterializedState::default()).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["v"], serde_json::json!(SNAPSHOT_VERSION));
}
