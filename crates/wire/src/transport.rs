// SPDX-License-Identifier: MIT

//! [`MessageTransport`]: the three-operation capability the engine relies
//! on (spec.md §6.1). Implementations live in `qmon-adapters`; this crate
//! only names the contract and the payload shapes that flow across it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport session unavailable: {0}")]
    Unavailable(String),
    #[error("transport timed out")]
    TimedOut,
    #[error("transport returned a malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Return the next unread mention, or an empty-status payload, immediately.
    Unread,
    /// Return the most recent mention regardless of read state.
    Latest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOptions {
    pub wait: bool,
    pub mark_read: bool,
    pub mode: CheckMode,
    pub limit: u32,
    pub timeout_secs: u64,
    pub filter_agent: Option<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self { wait: false, mark_read: true, mode: CheckMode::Unread, limit: 1, timeout_secs: 30, filter_agent: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub accepted: bool,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingResult {
    pub status: String,
    pub timestamp_ms: u64,
}

/// One raw record as the transport's `events[]` shape describes it
/// (spec.md §6.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEvent {
    pub id: Option<String>,
    pub sender_name: String,
    pub content: String,
}

/// What `check()` returns: either a structured event list or the
/// transport's own textual status block (bullet lines, `[id:…]` markers,
/// "No mentions"/"WAIT SUCCESS" status strings).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Events { events: Vec<RawEvent> },
    Text(String),
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, content: &str, parent_message_id: Option<&str>) -> Result<Ack, TransportError>;
    async fn check(&self, options: &CheckOptions) -> Result<Payload, TransportError>;
    async fn send_ping(&self) -> Result<PingResult, TransportError>;

    /// True when this session runs over a network rather than in-process
    /// (spec.md §4.5: only remote sessions get a [`Heartbeat`](crate)).
    fn is_remote(&self) -> bool;

    /// Tear down the session (e.g. terminate a launcher process). Sessions
    /// with nothing to close (in-process fixtures) use the default no-op.
    async fn close(&self) {}
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
