// SPDX-License-Identifier: MIT

//! Pure mention parsing (spec.md §4.2): turns whatever the transport
//! returned into zero or one canonical mentions for a given agent.

use crate::transport::{Payload, RawEvent};
use qmon_core::{AgentId, MessageId};

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMention {
    pub id: MessageId,
    pub sender: AgentId,
    pub content: String,
}

const STATUS_MARKERS: &[&str] = &["No mentions", "WAIT SUCCESS"];

/// `parse(agent_id, payload) -> Option<CanonicalMention>` (spec.md §4.2).
///
/// Self-mentions (`sender == agent_id`) and status payloads are filtered
/// out here rather than left for the caller, so a poller that blindly
/// stores whatever this returns can never enqueue a feedback loop.
pub fn parse(agent_id: &AgentId, payload: &Payload) -> Option<CanonicalMention> {
    match payload {
        Payload::Events { events } => parse_events(agent_id, events),
        Payload::Text(text) => parse_text(agent_id, text),
    }
}

fn parse_events(agent_id: &AgentId, events: &[RawEvent]) -> Option<CanonicalMention> {
    let target = format!("@{agent_id}");
    events.iter().find_map(|event| {
        if !event.content.contains(&target) {
            return None;
        }
        if event.sender_name == agent_id.as_str() {
            tracing::debug!(agent = %agent_id, sender = %event.sender_name, "skipping self-mention");
            return None;
        }
        let id = event.id.as_ref()?;
        let sender = AgentId::parse(&event.sender_name).ok()?;
        Some(CanonicalMention { id: MessageId::new(id), sender, content: event.content.clone() })
    })
}

fn parse_text(agent_id: &AgentId, text: &str) -> Option<CanonicalMention> {
    if STATUS_MARKERS.iter().any(|marker| text.contains(marker)) {
        return None;
    }

    let target = format!("@{agent_id}");
    let line = text.lines().find(|line| line.trim_start().starts_with('•') && line.contains(&target))?;

    let id = extract_id(text)?;
    let sender = extract_sender(line)?;
    if sender == *agent_id {
        tracing::debug!(agent = %agent_id, %sender, "skipping self-mention");
        return None;
    }

    Some(CanonicalMention { id: MessageId::new(id), sender, content: text.to_string() })
}

fn extract_id(text: &str) -> Option<String> {
    let start = text.find("[id:")? + "[id:".len();
    let rest = &text[start..];
    let end = rest.find(']')?;
    Some(rest[..end].trim().trim_end_matches('.').to_string())
}

/// A bullet line reads `• <sender>: @<target> <body>`.
fn extract_sender(line: &str) -> Option<AgentId> {
    let after_bullet = line.trim_start().trim_start_matches('•').trim_start();
    let colon = after_bullet.find(':')?;
    AgentId::parse(after_bullet[..colon].trim()).ok()
}

#[cfg(test)]
#[path = "mention_tests.rs"]
mod tests;
