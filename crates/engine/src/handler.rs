// SPDX-License-Identifier: MIT

//! [`MessageHandler`]: the pluggable capability the host provides to turn
//! one incoming mention into a reply (spec.md §6.2).

use async_trait::async_trait;
use qmon_core::{AgentId, MessageId};

/// A mention handed to a [`MessageHandler`], already canonicalized by the
/// [`qmon_wire::mention::parse`] step.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub id: MessageId,
    pub sender: AgentId,
    pub content: String,
    pub enqueued_at_ms: u64,
}

/// `async fn handle(IncomingMessage) -> String` as a capability (spec.md
/// §6.2, §9 "Pluggable handler" — a trait with one method rather than a
/// class hierarchy). An empty return means "send nothing"; the trait must
/// not be implemented to panic or otherwise unwind — the Processor treats
/// any error the implementation chooses to surface as a plain string in
/// the reply, never as a Rust-level error.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, incoming: IncomingMessage) -> String;
}
