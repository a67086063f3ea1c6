// SPDX-License-Identifier: MIT

use super::*;
use crate::transport_spec::TransportSpec;
use indexmap::indexmap;

fn agent(s: &str) -> AgentId {
    AgentId::parse(s).unwrap()
}

#[test]
fn conventional_label_wins_primary_even_when_not_first() {
    let cfg = AgentConfig {
        agent_id: agent("a1"),
        transports: indexmap! {
            "tools".to_string() => TransportSpec::new("tools-bridge"),
            "messaging".to_string() => TransportSpec::new("mention-bridge"),
        },
        permissions: serde_json::Value::Null,
        handler_params: serde_json::Value::Null,
    };
    let (name, spec) = cfg.primary_transport().unwrap();
    assert_eq!(name, "messaging");
    assert_eq!(spec.command, "mention-bridge");
}

#[test]
fn first_entry_wins_when_no_conventional_label() {
    let cfg = AgentConfig {
        agent_id: agent("a1"),
        transports: indexmap! {
            "tools".to_string() => TransportSpec::new("tools-bridge"),
            "other".to_string() => TransportSpec::new("other-bridge"),
        },
        permissions: serde_json::Value::Null,
        handler_params: serde_json::Value::Null,
    };
    let (name, _) = cfg.primary_transport().unwrap();
    assert_eq!(name, "tools");
}

#[test]
fn no_transports_yields_no_primary() {
    let cfg = AgentConfig {
        agent_id: agent("a1"),
        transports: IndexMap::new(),
        permissions: serde_json::Value::Null,
        handler_params: serde_json::Value::Null,
    };
    assert!(cfg.primary_transport().is_none());
}
