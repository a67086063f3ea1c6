// SPDX-License-Identifier: MIT

//! The durability substrate for [`crate::message`]/[`crate::agent_status`]:
//! an append-only event log replayed into materialized state on startup
//! (generalized from the teacher's event-sourced WAL, SPEC_FULL.md §3).
//!
//! Event handlers that replay these into state **must be idempotent** —
//! the same event may be applied twice (once for immediate visibility, once
//! after WAL replay on restart).

use crate::agent::AgentId;
use crate::message::MessageId;
use crate::monitor::MonitorId;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Event {
    /// A mention was accepted into the queue (no-op if the `(id, agent)`
    /// key already exists — idempotent ingest, I3).
    MessagePut { id: MessageId, agent: AgentId, sender: AgentId, content: String, enqueued_at_ms: u64 },
    MessageProcessingStarted { id: MessageId, agent: AgentId, at_ms: u64 },
    MessageProcessed { id: MessageId, agent: AgentId, at_ms: u64 },
    AgentPaused { agent: AgentId, reason: String, at_ms: u64, resume_at_ms: Option<u64> },
    AgentResumed { agent: AgentId, at_ms: u64, cleared_unprocessed: bool },
    MessagesCleared { agent: AgentId, only_unprocessed: bool },
    MessagesCleanedUp { before_ms: u64, removed: u64 },
    MonitorStarted { monitor_id: MonitorId, agent: AgentId, at_ms: u64 },
    MonitorStopped { monitor_id: MonitorId, at_ms: u64 },
    KillSwitchActivated { at_ms: u64 },
    KillSwitchDeactivated { at_ms: u64 },
}
