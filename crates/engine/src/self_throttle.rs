// SPDX-License-Identifier: MIT

//! Self-throttle command detection and self-mention stripping applied to a
//! handler's reply text before it goes out (spec.md §4.4 step 7, §9
//! "Self-mention stripping").

use qmon_core::AgentId;

/// How long a `#done` pause lasts before auto-resume (spec.md §4.4 step 7).
pub const DONE_PAUSE_SECS: u64 = 60;

/// What a reply asked the engine to do to the agent's own pause state, if
/// anything. `None` means the reply carried no throttle token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleCommand {
    pub reason: String,
    pub resume_at_ms: Option<u64>,
}

/// Case-insensitive scan for `#pause`, `#stop`, `#done` (spec.md §4.4 step
/// 7). `#done` additionally schedules an auto-resume `DONE_PAUSE_SECS`
/// out, tagged with the `Done:` prefix that triggers I6's backlog clear.
pub fn detect_command(reply: &str, now_ms: u64) -> Option<ThrottleCommand> {
    let lower = reply.to_ascii_lowercase();
    if lower.contains("#done") {
        return Some(ThrottleCommand {
            reason: format!("{} agent requested done", qmon_core::DONE_PREFIX),
            resume_at_ms: Some(now_ms + DONE_PAUSE_SECS * 1_000),
        });
    }
    if lower.contains("#pause") || lower.contains("#stop") {
        return Some(ThrottleCommand {
            reason: "Self-paused: agent requested pause".to_string(),
            resume_at_ms: None,
        });
    }
    None
}

/// Strips a verbatim `@<agent_id>` self-mention from outgoing text,
/// keeping the bare name, so the reply cannot re-trigger the agent's own
/// mention queue (spec.md §9, invariant — not configurable).
pub fn strip_self_mention(reply: &str, agent_id: &AgentId) -> String {
    reply.replace(&format!("@{agent_id}"), agent_id.as_str())
}

#[cfg(test)]
#[path = "self_throttle_tests.rs"]
mod tests;
