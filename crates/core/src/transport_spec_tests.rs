// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn local_spec_is_not_remote() {
    let spec = TransportSpec::new("oddmention-bridge");
    assert!(!spec.is_remote());
}

#[test]
fn spec_with_url_env_is_remote() {
    let mut spec = TransportSpec::new("oddmention-bridge");
    spec.env.insert("url".into(), "https://svc.example/agents/a1".into());
    assert!(spec.is_remote());
}

#[test]
fn spec_with_url_arg_is_remote() {
    let mut spec = TransportSpec::new("oddmention-bridge");
    spec.args.push("wss://svc.example/agents/a1".into());
    assert!(spec.is_remote());
}

#[test]
fn agent_id_extracted_from_agents_path() {
    let mut spec = TransportSpec::new("oddmention-bridge");
    spec.env.insert("url".into(), "https://svc.example/agents/team-bot-1".into());
    assert_eq!(spec.agent_id_from_url().as_deref(), Some("team-bot-1"));
}

#[test]
fn agent_id_extraction_stops_at_trailing_segment() {
    let mut spec = TransportSpec::new("oddmention-bridge");
    spec.env.insert("url".into(), "https://svc.example/agents/team-bot-1/sessions".into());
    assert_eq!(spec.agent_id_from_url().as_deref(), Some("team-bot-1"));
}

#[test]
fn no_agents_path_yields_none() {
    let spec = TransportSpec::new("oddmention-bridge");
    assert_eq!(spec.agent_id_from_url(), None);
}
