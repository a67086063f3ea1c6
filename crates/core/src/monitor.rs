// SPDX-License-Identifier: MIT

//! Supervisor-side record of a running (or stopped) per-agent engine.

use crate::agent::AgentId;
use crate::define_id;
use std::path::PathBuf;

define_id! {
    /// A supervised monitor instance (one [`crate::monitor::MonitorRecord`] per spawn).
    pub struct MonitorId("mon-");
}

define_id! {
    /// A running supervisor process (distinguishes "my orphan" from "a
    /// sibling supervisor's child" across restarts — spec.md §9).
    pub struct SupervisorInstanceId("sup-");
}

/// Which handler a monitor was started with. External handler
/// implementations (LLM, tool-using workflows) are out of scope (spec.md
/// §1); only the reference [`Echo`](HandlerKind::Echo) ships here, plus
/// named slots for host-provided handlers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandlerKind {
    Echo,
    Local { model: String },
    Remote { sdk: String, model: String },
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerKind::Echo => write!(f, "echo"),
            HandlerKind::Local { model } => write!(f, "local:{model}"),
            HandlerKind::Remote { sdk, model } => write!(f, "remote:{sdk}:{model}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MonitorState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Supervisor bookkeeping for one spawned engine (spec.md §3 `MonitorRecord`, I7).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MonitorRecord {
    pub monitor_id: MonitorId,
    pub agent_id: AgentId,
    pub handler_kind: HandlerKind,
    pub transport_label: String,
    pub supervisor_instance_id: SupervisorInstanceId,
    pub child_pid: u32,
    pub started_at_ms: u64,
    pub stopped_at_ms: Option<u64>,
    pub state: MonitorState,
    pub log_path: PathBuf,
    pub deployment_group: Option<String>,
}

impl MonitorRecord {
    pub fn is_running(&self) -> bool {
        matches!(self.state, MonitorState::Starting | MonitorState::Running)
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
