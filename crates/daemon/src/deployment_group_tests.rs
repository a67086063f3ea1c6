use super::*;
use crate::supervisor::Supervisor;
use qmon_core::{AgentId, DeploymentGroupEntry, HandlerKind, SystemClock};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn fake_engine(dir: &Path) -> PathBuf {
    let path = dir.join("fake-engine.sh");
    std::fs::write(&path, "#!/bin/sh\nsleep 30\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn supervisor(dir: &Path) -> Supervisor<SystemClock> {
    let config_dir = dir.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    Supervisor::open(fake_engine(dir), config_dir, dir.join("data"), SystemClock).unwrap()
}

fn agent_config(id: &str) -> AgentConfig {
    let mut transports = indexmap::IndexMap::new();
    transports.insert("messaging".into(), qmon_core::TransportSpec::new("echo"));
    AgentConfig {
        agent_id: AgentId::parse(id).unwrap(),
        transports,
        permissions: serde_json::Value::Null,
        handler_params: serde_json::Value::Null,
    }
}

#[tokio::test(start_paused = true)]
async fn starts_every_entry_in_order_respecting_delays() {
    let dir = tempfile::tempdir().unwrap();
    let sup = supervisor(dir.path());
    let configs = vec![agent_config("a1"), agent_config("a2")];
    let group = DeploymentGroup {
        id: "squad".to_string(),
        entries: vec![
            DeploymentGroupEntry {
                agent_id: AgentId::parse("a1").unwrap(),
                handler_kind: HandlerKind::Echo,
                params: serde_json::Value::Null,
                start_delay_secs: 0,
            },
            DeploymentGroupEntry {
                agent_id: AgentId::parse("a2").unwrap(),
                handler_kind: HandlerKind::Echo,
                params: serde_json::Value::Null,
                start_delay_secs: 5,
            },
        ],
    };

    let results = start_group(&sup, &group, &configs).await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_ok()));

    let records = sup.list();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.deployment_group.as_deref() == Some("squad")));

    for record in records {
        sup.kill(record.monitor_id).unwrap();
    }
}

#[tokio::test]
async fn an_entry_with_no_matching_config_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let sup = supervisor(dir.path());
    let configs = vec![agent_config("a1")];
    let group = DeploymentGroup {
        id: "squad".to_string(),
        entries: vec![
            DeploymentGroupEntry {
                agent_id: AgentId::parse("a1").unwrap(),
                handler_kind: HandlerKind::Echo,
                params: serde_json::Value::Null,
                start_delay_secs: 0,
            },
            DeploymentGroupEntry {
                agent_id: AgentId::parse("ghost").unwrap(),
                handler_kind: HandlerKind::Echo,
                params: serde_json::Value::Null,
                start_delay_secs: 0,
            },
        ],
    };

    let results = start_group(&sup, &group, &configs).await;
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());

    let records = sup.list();
    assert_eq!(records.len(), 1);
    sup.kill(records[0].monitor_id).unwrap();
}
