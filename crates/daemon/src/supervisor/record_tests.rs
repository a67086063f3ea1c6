use super::*;
use qmon_core::{AgentId, HandlerKind, MonitorId, MonitorState, SupervisorInstanceId};

fn record(agent: &str) -> MonitorRecord {
    MonitorRecord {
        monitor_id: MonitorId::new(),
        agent_id: AgentId::parse(agent).unwrap(),
        handler_kind: HandlerKind::Echo,
        transport_label: "messaging".to_string(),
        supervisor_instance_id: SupervisorInstanceId::new(),
        child_pid: 4242,
        started_at_ms: 1000,
        stopped_at_ms: None,
        state: MonitorState::Running,
        log_path: "/tmp/a1.log".into(),
        deployment_group: None,
    }
}

#[test]
fn upserted_records_survive_reopening_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = default_table_path(dir.path());

    {
        let table = ProcessTable::open(path.clone()).unwrap();
        table.upsert(record("a1")).unwrap();
    }

    let reopened = ProcessTable::open(path).unwrap();
    let restored = reopened.get(&AgentId::parse("a1").unwrap()).unwrap();
    assert_eq!(restored.child_pid, 4242);
}

#[test]
fn upserting_the_same_agent_twice_replaces_the_prior_record() {
    let dir = tempfile::tempdir().unwrap();
    let table = ProcessTable::open(default_table_path(dir.path())).unwrap();

    table.upsert(record("a1")).unwrap();
    let mut second = record("a1");
    second.child_pid = 9999;
    table.upsert(second).unwrap();

    assert_eq!(table.all().len(), 1);
    assert_eq!(table.get(&AgentId::parse("a1").unwrap()).unwrap().child_pid, 9999);
}

#[test]
fn find_looks_up_by_monitor_id_rather_than_agent() {
    let dir = tempfile::tempdir().unwrap();
    let table = ProcessTable::open(default_table_path(dir.path())).unwrap();
    let r = record("a1");
    let monitor_id = r.monitor_id;
    table.upsert(r).unwrap();

    assert!(table.find(monitor_id).is_some());
}

#[test]
fn removing_an_unknown_agent_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let table = ProcessTable::open(default_table_path(dir.path())).unwrap();
    assert!(table.remove(&AgentId::parse("ghost").unwrap()).unwrap().is_none());
}

#[test]
fn clear_empties_the_table_and_persists_the_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = default_table_path(dir.path());
    let table = ProcessTable::open(path.clone()).unwrap();
    table.upsert(record("a1")).unwrap();
    table.clear().unwrap();

    assert!(table.all().is_empty());
    let reopened = ProcessTable::open(path).unwrap();
    assert!(reopened.all().is_empty());
}
