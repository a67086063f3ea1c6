use super::*;
use indexmap::indexmap;
use qmon_core::{AgentId, TransportSpec};
use std::collections::BTreeMap;

fn local_spec() -> TransportSpec {
    TransportSpec { command: "local".to_string(), args: vec![], env: BTreeMap::new() }
}

fn broken_spec() -> TransportSpec {
    TransportSpec { command: "qmon-definitely-not-a-real-binary".to_string(), args: vec![], env: BTreeMap::new() }
}

fn config(transports: indexmap::IndexMap<TransportName, TransportSpec>) -> AgentConfig {
    AgentConfig { agent_id: AgentId::parse("bot").unwrap(), transports, permissions: serde_json::Value::Null, handler_params: serde_json::Value::Null }
}

#[tokio::test]
async fn opens_the_conventional_messaging_entry_as_primary() {
    let cfg = config(indexmap! {
        "messaging".to_string() => local_spec(),
        "extra".to_string() => local_spec(),
    });

    let manager = TransportManager::open(&cfg).await.unwrap();
    assert!(!manager.primary().is_remote());
}

#[tokio::test]
async fn a_broken_non_primary_transport_is_skipped_not_fatal() {
    let cfg = config(indexmap! {
        "messaging".to_string() => local_spec(),
        "extra".to_string() => broken_spec(),
    });

    let manager = TransportManager::open(&cfg).await.unwrap();
    assert!(!manager.primary().is_remote());
}

#[tokio::test]
async fn a_broken_primary_transport_fails_the_whole_open() {
    let cfg = config(indexmap! {
        "messaging".to_string() => broken_spec(),
    });

    let result = TransportManager::open(&cfg).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn empty_config_is_rejected() {
    let cfg = config(indexmap::IndexMap::new());
    let result = TransportManager::open(&cfg).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn close_all_does_not_panic_with_only_local_sessions() {
    let cfg = config(indexmap! { "messaging".to_string() => local_spec() });
    let manager = TransportManager::open(&cfg).await.unwrap();
    manager.close_all().await;
}
