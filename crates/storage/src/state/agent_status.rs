// SPDX-License-Identifier: MIT

//! Per-agent pause/resume state, rebuilt by replaying [`Event`]s.

use qmon_core::{AgentId, AgentStatus, Event};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AgentStatusState {
    by_agent: HashMap<AgentId, AgentStatus>,
}

impl AgentStatusState {
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::AgentPaused { agent, reason, at_ms, resume_at_ms } => {
                self.by_agent.insert(agent.clone(), AgentStatus::paused(reason.clone(), *at_ms, *resume_at_ms));
            }
            Event::AgentResumed { agent, .. } => {
                self.by_agent.entry(agent.clone()).or_default().resumed();
            }
            _ => {}
        }
    }

    pub fn get(&self, agent: &AgentId) -> AgentStatus {
        self.by_agent.get(agent).cloned().unwrap_or_default()
    }

    /// Agents currently paused with a `resume_at_ms` that has elapsed.
    pub fn due_for_auto_resume(&self, now_ms: u64) -> Vec<AgentId> {
        self.by_agent
            .iter()
            .filter(|(_, status)| status.auto_resume_due(now_ms))
            .map(|(agent, _)| agent.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "agent_status_state_tests.rs"]
mod tests;
