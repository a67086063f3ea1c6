// SPDX-License-Identifier: MIT

//! OS process control for supervised engines: spawning a detached child in
//! its own process group (so a single signal reaches the whole tree) and
//! liveness/termination via `nix` (spec.md §4.6).

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// How long `stop()` waits for a cooperative SIGTERM before escalating to
/// SIGKILL (spec.md §4.6 "stop").
pub const GRACEFUL_STOP_TIMEOUT: Duration = Duration::from_secs(5);
const GRACEFUL_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn engine process: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("signal delivery failed: {0}")]
    Signal(#[from] nix::Error),
}

/// Arguments needed to launch one agent's engine as a child process.
pub struct SpawnSpec<'a> {
    pub exe: &'a Path,
    pub agent_id: &'a str,
    pub config_dir: &'a Path,
    pub data_dir: &'a Path,
    pub log_path: &'a Path,
    /// `HandlerKind` as JSON (spec.md §6.8): the child re-resolves its
    /// `AgentConfig` from `config_dir` itself, but which handler to run is
    /// a choice the Supervisor makes at `start()` time, not something a
    /// config file declares.
    pub handler_kind_json: &'a str,
}

/// The hidden subcommand `qmon-cli` re-execs itself with to become an
/// engine process. Never shown in `--help` (spec.md §6.8 "process entrypoint").
pub const RUN_ENGINE_SUBCOMMAND: &str = "__run-engine";

/// Spawn `spec.exe __run-engine ...` detached, in its own process group, with
/// stdout/stderr redirected to `spec.log_path`. Returns the child and its pid;
/// a reaper task is spawned to wait on it and avoid zombies.
pub fn spawn_engine(spec: &SpawnSpec<'_>) -> Result<u32, ProcessError> {
    let log_file_out = std::fs::OpenOptions::new().create(true).append(true).open(spec.log_path)?;
    let log_file_err = log_file_out.try_clone()?;

    let mut command = Command::new(spec.exe);
    command
        .arg(RUN_ENGINE_SUBCOMMAND)
        .arg("--agent-id")
        .arg(spec.agent_id)
        .arg("--config-dir")
        .arg(spec.config_dir)
        .arg("--data-dir")
        .arg(spec.data_dir)
        .arg("--handler-kind")
        .arg(spec.handler_kind_json)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::from(log_file_out))
        .stderr(std::process::Stdio::from(log_file_err))
        .process_group(0);

    let mut child = command.spawn()?;
    let pid = child.id().expect("freshly spawned child always has a pid");

    let agent_id = spec.agent_id.to_string();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => {
                tracing::info!(agent_id = %agent_id, %status, "engine process exited");
            }
            Err(err) => {
                tracing::error!(agent_id = %agent_id, error = %err, "failed to wait on engine process");
            }
        }
    });

    Ok(pid)
}

/// Whether a pid is still alive, probed by sending the null signal
/// (no permission/existence failure means the process is there).
pub fn is_alive(pid: u32) -> bool {
    let Ok(pid) = i32::try_from(pid) else { return false };
    signal::kill(Pid::from_raw(pid), None).is_ok()
}

/// Send `sig` to the whole process group rooted at `pid` (negative pid is
/// the POSIX convention for "the group", valid because `spawn_engine` put
/// each child in its own group via `process_group(0)`).
fn signal_group(pid: u32, sig: Signal) -> Result<(), ProcessError> {
    let pid = i32::try_from(pid).map_err(|_| nix::Error::EINVAL)?;
    match signal::kill(Pid::from_raw(-pid), sig) {
        Ok(()) => Ok(()),
        Err(nix::Error::ESRCH) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Cooperative shutdown: SIGTERM the group, poll for up to
/// [`GRACEFUL_STOP_TIMEOUT`], then SIGKILL if it hasn't exited.
pub async fn stop_gracefully(pid: u32) -> Result<(), ProcessError> {
    signal_group(pid, Signal::SIGTERM)?;

    let deadline = tokio::time::Instant::now() + GRACEFUL_STOP_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if !is_alive(pid) {
            return Ok(());
        }
        tokio::time::sleep(GRACEFUL_POLL_INTERVAL).await;
    }

    if is_alive(pid) {
        signal_group(pid, Signal::SIGKILL)?;
    }
    Ok(())
}

/// Immediate hard kill of the process tree (spec.md §4.6 "kill").
pub fn hard_kill(pid: u32) -> Result<(), ProcessError> {
    signal_group(pid, Signal::SIGKILL)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
