// SPDX-License-Identifier: MIT

//! The materialized view rebuilt by replaying the WAL on startup: message
//! queues, agent pause state, and the kill switch.

pub mod agent_status;
pub mod messages;

use agent_status::AgentStatusState;
use messages::MessagesState;
use qmon_core::Event;

/// Monitor lifecycle (spawn/stop) is tracked by the supervisor's own
/// process-table file, not replayed through this log — a monitor record
/// names a live OS process, which a WAL replay cannot resurrect. This
/// state only folds in the two events that shape message/status
/// semantics plus the process-wide kill switch.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MaterializedState {
    pub messages: MessagesState,
    pub statuses: AgentStatusState,
    pub kill_switch_active: bool,
    /// Highest WAL seq folded into this state; used to resume replay.
    pub applied_seq: u64,
}

impl MaterializedState {
    /// Apply a single event. Must be idempotent: replaying the same
    /// `(seq, event)` twice leaves state unchanged on the second call.
    pub fn apply_event(&mut self, seq: u64, event: &Event) {
        if seq <= self.applied_seq {
            return;
        }
        self.applied_seq = seq;

        self.messages.apply(event);
        self.statuses.apply(event);

        match event {
            Event::KillSwitchActivated { .. } => self.kill_switch_active = true,
            Event::KillSwitchDeactivated { .. } => self.kill_switch_active = false,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
