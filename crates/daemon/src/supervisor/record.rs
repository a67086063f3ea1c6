// SPDX-License-Identifier: MIT

//! The supervisor's own process table: `MonitorRecord`s persisted to a
//! JSON file, reloaded on restart (spec.md §9 "process ownership across
//! restarts" — monitor lifecycle is never replayed through the WAL, per
//! `qmon_storage`'s own `MaterializedState` doc comment).

use parking_lot::Mutex;
use qmon_core::{AgentId, MonitorId, MonitorRecord};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed process table: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persisted table of [`MonitorRecord`]s, one entry per agent (I7: at
/// most one *running* monitor per agent, enforced by callers).
pub struct ProcessTable {
    path: PathBuf,
    records: Mutex<HashMap<AgentId, MonitorRecord>>,
}

impl ProcessTable {
    pub fn open(path: PathBuf) -> Result<Self, RecordError> {
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let list: Vec<MonitorRecord> = serde_json::from_str(&raw)?;
            list.into_iter().map(|r| (r.agent_id.clone(), r)).collect()
        } else {
            HashMap::new()
        };
        Ok(Self { path, records: Mutex::new(records) })
    }

    fn persist(&self, records: &HashMap<AgentId, MonitorRecord>) -> Result<(), RecordError> {
        let list: Vec<&MonitorRecord> = records.values().collect();
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&list)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn get(&self, agent_id: &AgentId) -> Option<MonitorRecord> {
        self.records.lock().get(agent_id).cloned()
    }

    pub fn find(&self, monitor_id: MonitorId) -> Option<MonitorRecord> {
        self.records.lock().values().find(|r| r.monitor_id == monitor_id).cloned()
    }

    pub fn all(&self) -> Vec<MonitorRecord> {
        self.records.lock().values().cloned().collect()
    }

    pub fn upsert(&self, record: MonitorRecord) -> Result<(), RecordError> {
        let mut records = self.records.lock();
        records.insert(record.agent_id.clone(), record);
        self.persist(&records)
    }

    pub fn remove(&self, agent_id: &AgentId) -> Result<Option<MonitorRecord>, RecordError> {
        let mut records = self.records.lock();
        let removed = records.remove(agent_id);
        self.persist(&records)?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), RecordError> {
        let mut records = self.records.lock();
        records.clear();
        self.persist(&records)
    }
}

/// Where the Supervisor persists its process table by convention.
pub fn default_table_path(data_dir: &Path) -> PathBuf {
    data_dir.join("monitors.json")
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
