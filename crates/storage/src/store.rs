// SPDX-License-Identifier: MIT

//! [`MessageStore`]: the durable per-agent mention queue that the engine's
//! Poller/Processor tasks read and write (spec.md §4.1).

use crate::migration::MigrationRegistry;
use crate::snapshot;
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use parking_lot::Mutex;
use qmon_core::{AgentId, AgentStatus, Clock, Event, MessageId, StoredMessage};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),
}

pub struct MessageStore<C: Clock> {
    wal: Mutex<Wal>,
    state: Mutex<MaterializedState>,
    clock: C,
    snapshot_path: Option<PathBuf>,
}

impl<C: Clock> MessageStore<C> {
    pub fn open(
        wal_path: impl AsRef<Path>,
        snapshot_path: Option<PathBuf>,
        clock: C,
    ) -> Result<Self, StoreError> {
        let registry = MigrationRegistry::new();
        let mut state = snapshot_path
            .as_ref()
            .and_then(|p| snapshot::read(p, &registry).transpose())
            .transpose()?
            .unwrap_or_default();

        let mut wal = Wal::open(wal_path, state.applied_seq)?;
        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(entry.seq, &entry.event);
            wal.mark_processed(entry.seq);
        }

        Ok(Self { wal: Mutex::new(wal), state: Mutex::new(state), clock, snapshot_path })
    }

    fn append(&self, event: Event) -> Result<(), StoreError> {
        let mut wal = self.wal.lock();
        let seq = wal.append(&event)?;
        wal.flush()?;
        wal.mark_processed(seq);
        self.state.lock().apply_event(seq, &event);
        Ok(())
    }

    pub fn put(&self, id: MessageId, agent: AgentId, sender: AgentId, content: String) -> Result<(), StoreError> {
        let enqueued_at_ms = self.clock.epoch_ms();
        self.append(Event::MessagePut { id, agent, sender, content, enqueued_at_ms })
    }

    pub fn peek_pending(&self, agent: &AgentId) -> Vec<StoredMessage> {
        self.state.lock().messages.pending(agent).into_iter().cloned().collect()
    }

    pub fn count_pending(&self, agent: &AgentId) -> usize {
        self.state.lock().messages.count_pending(agent)
    }

    pub fn mark_processing(&self, id: MessageId, agent: AgentId) -> Result<(), StoreError> {
        let at_ms = self.clock.epoch_ms();
        self.append(Event::MessageProcessingStarted { id, agent, at_ms })
    }

    pub fn mark_processed(&self, id: MessageId, agent: AgentId) -> Result<(), StoreError> {
        let at_ms = self.clock.epoch_ms();
        self.append(Event::MessageProcessed { id, agent, at_ms })
    }

    pub fn clear_agent(&self, agent: AgentId) -> Result<(), StoreError> {
        self.append(Event::MessagesCleared { agent, only_unprocessed: false })
    }

    pub fn clear_pending(&self, agent: AgentId) -> Result<(), StoreError> {
        self.append(Event::MessagesCleared { agent, only_unprocessed: true })
    }

    /// Drop processed rows older than `before_ms` across all agents.
    pub fn cleanup(&self, before_ms: u64) -> Result<u64, StoreError> {
        let removed = self.state.lock().messages.count_removable_before(before_ms);
        self.append(Event::MessagesCleanedUp { before_ms, removed })?;
        Ok(removed)
    }

    pub fn pause(&self, agent: AgentId, reason: String, resume_at_ms: Option<u64>) -> Result<(), StoreError> {
        let at_ms = self.clock.epoch_ms();
        self.append(Event::AgentPaused { agent, reason, at_ms, resume_at_ms })
    }

    pub fn resume(&self, agent: AgentId) -> Result<(), StoreError> {
        let status = self.get_status(&agent);
        let cleared_unprocessed = status.is_done_pause();
        let at_ms = self.clock.epoch_ms();
        if cleared_unprocessed {
            self.append(Event::MessagesCleared { agent: agent.clone(), only_unprocessed: true })?;
        }
        self.append(Event::AgentResumed { agent, at_ms, cleared_unprocessed })
    }

    pub fn get_status(&self, agent: &AgentId) -> AgentStatus {
        self.state.lock().statuses.get(agent)
    }

    /// Resume every agent whose pause timer has elapsed, clearing their
    /// backlog first when the pause was `Done:`-prefixed (I6). Returns the
    /// resumed agent ids.
    pub fn check_auto_resume(&self) -> Result<Vec<AgentId>, StoreError> {
        let now_ms = self.clock.epoch_ms();
        let due = self.state.lock().statuses.due_for_auto_resume(now_ms);
        for agent in &due {
            self.resume(agent.clone())?;
        }
        Ok(due)
    }

    pub fn kill_switch_active(&self) -> bool {
        self.state.lock().kill_switch_active
    }

    pub fn activate_kill_switch(&self) -> Result<(), StoreError> {
        let at_ms = self.clock.epoch_ms();
        self.append(Event::KillSwitchActivated { at_ms })
    }

    pub fn deactivate_kill_switch(&self) -> Result<(), StoreError> {
        let at_ms = self.clock.epoch_ms();
        self.append(Event::KillSwitchDeactivated { at_ms })
    }

    /// Persist the current materialized state so future opens can skip
    /// straight past this point in the WAL.
    pub fn snapshot(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot_path {
            snapshot::write(path, &self.state.lock())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
