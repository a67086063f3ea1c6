// SPDX-License-Identifier: MIT

//! Per-agent pause/resume lifecycle (spec.md §3 `AgentStatus`, I4–I6).

/// The literal prefix that marks a pause as a "done" command (spec.md §4.4
/// step 7, §3 I6): when auto-resume fires, the unprocessed backlog is
/// cleared instead of simply flipping back to active.
pub const DONE_PREFIX: &str = "Done:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AgentLifecycle {
    Active,
    Paused,
}

impl Default for AgentLifecycle {
    fn default() -> Self {
        AgentLifecycle::Active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AgentStatus {
    pub status: AgentLifecycle,
    pub paused_at_ms: Option<u64>,
    pub paused_reason: Option<String>,
    pub resume_at_ms: Option<u64>,
}

impl AgentStatus {
    pub fn is_paused(&self) -> bool {
        matches!(self.status, AgentLifecycle::Paused)
    }

    /// True when `paused_reason` carries the [`DONE_PREFIX`] (I6).
    pub fn is_done_pause(&self) -> bool {
        self.paused_reason.as_deref().is_some_and(|r| r.starts_with(DONE_PREFIX))
    }

    /// True when a `resume_at_ms` has elapsed relative to `now_ms` (I5).
    pub fn auto_resume_due(&self, now_ms: u64) -> bool {
        self.is_paused() && self.resume_at_ms.is_some_and(|at| now_ms >= at)
    }

    pub fn paused(reason: impl Into<String>, paused_at_ms: u64, resume_at_ms: Option<u64>) -> Self {
        Self {
            status: AgentLifecycle::Paused,
            paused_at_ms: Some(paused_at_ms),
            paused_reason: Some(reason.into()),
            resume_at_ms,
        }
    }

    pub fn resumed(&mut self) {
        self.status = AgentLifecycle::Active;
        self.paused_at_ms = None;
        self.paused_reason = None;
        self.resume_at_ms = None;
    }
}

#[cfg(test)]
#[path = "agent_status_tests.rs"]
mod tests;
