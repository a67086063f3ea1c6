use super::*;

fn write_local_config(config_dir: &Path, agent_id: &str) {
    std::fs::write(
        config_dir.join(format!("{agent_id}.toml")),
        format!(
            r#"
            agent_id = "{agent_id}"
            [transports.messaging]
            command = "local"
            "#
        ),
    )
    .unwrap();
}

#[tokio::test]
async fn runs_and_shuts_down_cleanly_with_an_already_resolved_signal() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    write_local_config(&config_dir, "a1");

    let result = run(
        &AgentId::parse("a1").unwrap(),
        &config_dir,
        &dir.path().join("data"),
        &HandlerKind::Echo,
        std::future::ready(()),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn rejects_an_agent_id_with_no_matching_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();

    let result = run(
        &AgentId::parse("ghost").unwrap(),
        &config_dir,
        &dir.path().join("data"),
        &HandlerKind::Echo,
        std::future::ready(()),
    )
    .await;

    assert!(matches!(result, Err(RunEngineError::UnknownAgent(_))));
}

#[tokio::test]
async fn rejects_a_handler_kind_with_no_concrete_implementation() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    write_local_config(&config_dir, "a1");

    let result = run(
        &AgentId::parse("a1").unwrap(),
        &config_dir,
        &dir.path().join("data"),
        &HandlerKind::Local { model: "whatever".to_string() },
        std::future::ready(()),
    )
    .await;

    assert!(matches!(result, Err(RunEngineError::UnsupportedHandler(_))));
}
