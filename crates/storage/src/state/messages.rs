// SPDX-License-Identifier: MIT

//! In-memory per-agent message queues, rebuilt by replaying [`Event`]s.

use indexmap::IndexMap;
use qmon_core::{AgentId, Event, MessageId, StoredMessage};

/// Per-agent FIFO queues of mentions, insertion-ordered (I2: first-in
/// first-out within an agent).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MessagesState {
    by_agent: IndexMap<AgentId, IndexMap<MessageId, StoredMessage>>,
}

impl MessagesState {
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::MessagePut { id, agent, sender, content, enqueued_at_ms } => {
                let queue = self.by_agent.entry(agent.clone()).or_default();
                // Idempotent ingest (I3): a repeat `(id, agent)` key is a no-op.
                queue.entry(id.clone()).or_insert_with(|| {
                    StoredMessage::new(id.clone(), agent.clone(), sender.clone(), content.clone(), *enqueued_at_ms)
                });
            }
            Event::MessageProcessingStarted { id, agent, at_ms } => {
                if let Some(msg) = self.by_agent.get_mut(agent).and_then(|q| q.get_mut(id)) {
                    msg.processing_started_at_ms.get_or_insert(*at_ms);
                }
            }
            Event::MessageProcessed { id, agent, at_ms } => {
                if let Some(msg) = self.by_agent.get_mut(agent).and_then(|q| q.get_mut(id)) {
                    msg.processed = true;
                    msg.processing_completed_at_ms.get_or_insert(*at_ms);
                }
            }
            Event::MessagesCleared { agent, only_unprocessed } => {
                if let Some(queue) = self.by_agent.get_mut(agent) {
                    if *only_unprocessed {
                        queue.retain(|_, msg| msg.processed);
                    } else {
                        queue.clear();
                    }
                }
            }
            Event::MessagesCleanedUp { before_ms, .. } => {
                for queue in self.by_agent.values_mut() {
                    queue.retain(|_, msg| !msg.processed || msg.enqueued_at_ms >= *before_ms);
                }
            }
            _ => {}
        }
    }

    pub fn pending(&self, agent: &AgentId) -> Vec<&StoredMessage> {
        self.by_agent
            .get(agent)
            .map(|q| q.values().filter(|m| !m.processed).collect())
            .unwrap_or_default()
    }

    pub fn count_pending(&self, agent: &AgentId) -> usize {
        self.by_agent.get(agent).map(|q| q.values().filter(|m| !m.processed).count()).unwrap_or(0)
    }

    pub fn get(&self, agent: &AgentId, id: &MessageId) -> Option<&StoredMessage> {
        self.by_agent.get(agent)?.get(id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.by_agent.keys()
    }

    /// Count of processed rows older than `before_ms`, across all agents —
    /// what a [`Event::MessagesCleanedUp`] with this cutoff would remove.
    pub fn count_removable_before(&self, before_ms: u64) -> u64 {
        self.by_agent
            .values()
            .flat_map(|q| q.values())
            .filter(|m| m.processed && m.enqueued_at_ms < before_ms)
            .count() as u64
    }
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
