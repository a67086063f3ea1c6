// SPDX-License-Identifier: MIT

//! Error taxonomy shared across crates (spec.md §7).

use thiserror::Error;

/// Supervisor-level validation failures (spec.md §7: "Supervisor
/// validation" rejects with a typed failure, no side effects).
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("invalid agent id: {0}")]
    InvalidAgentId(#[from] crate::agent::InvalidAgentId),
    #[error("agent {0} already has a running monitor")]
    AlreadyRunning(crate::agent::AgentId),
    #[error("no monitor named {0}")]
    UnknownMonitor(crate::monitor::MonitorId),
    #[error("agent config for {0} is missing a primary transport")]
    NoPrimaryTransport(crate::agent::AgentId),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("process control failed: {0}")]
    Process(String),
}
