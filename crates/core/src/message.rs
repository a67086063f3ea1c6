// SPDX-License-Identifier: MIT

//! Durable mention rows: the unit the [`MessageStore`](crate) queues per agent.

use crate::agent::AgentId;
use smol_str::SmolStr;
use std::fmt;

/// The transport-assigned mention id, extracted from a `[id:xxxxxxxx-...]`
/// marker. Opaque and externally supplied — never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MessageId(SmolStr);

impl MessageId {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A queued mention, keyed by the composite `(id, agent)` pair (I1–I3 in
/// spec.md §3: idempotent ingest, FIFO per agent, never replayed once
/// processed).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub agent: AgentId,
    pub sender: AgentId,
    pub content: String,
    pub enqueued_at_ms: u64,
    pub processing_started_at_ms: Option<u64>,
    pub processing_completed_at_ms: Option<u64>,
    pub processed: bool,
    /// Always 0 in this version — retries/dead-lettering are a policy this
    /// field reserves room for (spec.md §9 "No retries / no DLQ"), not a
    /// feature this version implements.
    #[serde(default)]
    pub retry_count: u32,
}

impl StoredMessage {
    pub fn new(id: MessageId, agent: AgentId, sender: AgentId, content: String, enqueued_at_ms: u64) -> Self {
        Self {
            id,
            agent,
            sender,
            content,
            enqueued_at_ms,
            processing_started_at_ms: None,
            processing_completed_at_ms: None,
            processed: false,
            retry_count: 0,
        }
    }

    /// The composite primary key this row is stored under.
    pub fn key(&self) -> (MessageId, AgentId) {
        (self.id.clone(), self.agent.clone())
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
