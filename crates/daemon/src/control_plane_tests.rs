use super::*;
use crate::supervisor::Supervisor;
use qmon_core::SystemClock;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn fake_engine(dir: &Path) -> PathBuf {
    let path = dir.join("fake-engine.sh");
    std::fs::write(&path, "#!/bin/sh\nsleep 30\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(config_dir: &Path, agent_id: &str) {
    std::fs::write(
        config_dir.join(format!("{agent_id}.toml")),
        format!(
            r#"
            agent_id = "{agent_id}"
            [transports.messaging]
            command = "echo"
            "#
        ),
    )
    .unwrap();
}

fn control_plane(dir: &Path) -> ControlPlane<SystemClock> {
    let config_dir = dir.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    let supervisor =
        Supervisor::open(fake_engine(dir), config_dir.clone(), dir.join("data"), SystemClock).unwrap();
    ControlPlane::new(supervisor, config_dir)
}

#[tokio::test]
async fn start_loads_the_matching_config_and_spawns_a_monitor() {
    let dir = tempfile::tempdir().unwrap();
    let cp = control_plane(dir.path());
    write_config(&dir.path().join("config"), "a1");

    let monitor_id = cp.start(&AgentId::parse("a1").unwrap(), HandlerKind::Echo).unwrap();
    let status = cp.status();
    assert_eq!(status.running_count, 1);
    assert_eq!(status.total_count, 1);
    assert!(!status.kill_switch_active);

    cp.kill(monitor_id).unwrap();
}

#[tokio::test]
async fn starting_an_agent_with_no_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cp = control_plane(dir.path());

    let err = cp.start(&AgentId::parse("ghost").unwrap(), HandlerKind::Echo).unwrap_err();
    assert!(matches!(err, ControlPlaneError::UnknownAgent(_)));
}

#[tokio::test]
async fn kill_all_marks_the_switch_active_and_drops_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let cp = control_plane(dir.path());
    write_config(&dir.path().join("config"), "a1");
    cp.start(&AgentId::parse("a1").unwrap(), HandlerKind::Echo).unwrap();

    cp.kill_all().unwrap();

    let status = cp.status();
    assert!(status.kill_switch_active);
    assert_eq!(status.total_count, 0);
}

#[tokio::test]
async fn restart_reloads_the_agents_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cp = control_plane(dir.path());
    write_config(&dir.path().join("config"), "a1");
    let first = cp.start(&AgentId::parse("a1").unwrap(), HandlerKind::Echo).unwrap();

    let second = cp.restart(first).await.unwrap();
    assert_ne!(first, second);

    cp.kill(second).unwrap();
}
