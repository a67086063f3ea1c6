// SPDX-License-Identifier: MIT

//! Process-wide kill switch (spec.md §4.7): halts message *processing*
//! across all agents without touching the Poller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait KillSwitch: Send + Sync {
    fn is_active(&self) -> bool;
    fn activate(&self);
    fn deactivate(&self);
}

/// In-memory kill switch, shared via `Arc` across every Processor in a
/// process. The daemon's file-sentinel implementation lives in
/// `qmon-daemon` since it owns the data directory.
#[derive(Clone, Default)]
pub struct MemoryKillSwitch(Arc<AtomicBool>);

impl MemoryKillSwitch {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }
}

impl KillSwitch for MemoryKillSwitch {
    fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn activate(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn deactivate(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "kill_switch_tests.rs"]
mod tests;
