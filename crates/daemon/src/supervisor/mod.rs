// SPDX-License-Identifier: MIT

//! The Supervisor: starts, stops, and tracks one engine process per agent
//! (spec.md §4.6).

pub mod orphan;
pub mod process;
pub mod record;

use crate::kill_switch::FileKillSwitch;
use qmon_core::{
    AgentConfig, AgentId, Clock, HandlerKind, KillSwitch as _, MonitorId, MonitorRecord,
    MonitorState, SupervisorError, SupervisorInstanceId,
};
use record::ProcessTable;
use std::path::PathBuf;

pub struct Supervisor<C: Clock> {
    engine_exe: PathBuf,
    config_dir: PathBuf,
    data_dir: PathBuf,
    table: ProcessTable,
    kill_switch: FileKillSwitch,
    supervisor_instance_id: SupervisorInstanceId,
    clock: C,
}

impl<C: Clock> Supervisor<C> {
    pub fn open(
        engine_exe: PathBuf,
        config_dir: PathBuf,
        data_dir: PathBuf,
        clock: C,
    ) -> Result<Self, SupervisorError> {
        std::fs::create_dir_all(&data_dir)?;
        let table = ProcessTable::open(record::default_table_path(&data_dir))
            .map_err(|err| SupervisorError::Process(err.to_string()))?;
        let kill_switch = FileKillSwitch::new(&data_dir);
        Ok(Self {
            engine_exe,
            config_dir,
            data_dir,
            table,
            kill_switch,
            supervisor_instance_id: SupervisorInstanceId::new(),
            clock,
        })
    }

    pub fn kill_switch(&self) -> &FileKillSwitch {
        &self.kill_switch
    }

    fn agent_dir(&self, agent_id: &AgentId) -> PathBuf {
        self.data_dir.join(agent_id.as_str())
    }

    /// Kill any engine process matching `agent_id` that this supervisor
    /// instance doesn't currently track, left behind by a crashed prior run.
    fn reap_orphans_for(&self, agent_id: &AgentId) -> Result<(), SupervisorError> {
        let tracked_pids: Vec<u32> = self.table.all().iter().map(|r| r.child_pid).collect();
        let observed = orphan::scan_engine_processes();
        for candidate in orphan::orphans_among(observed, &tracked_pids) {
            if candidate.agent_id == agent_id.as_str() {
                process::hard_kill(candidate.pid)
                    .map_err(|err| SupervisorError::Process(err.to_string()))?;
            }
        }
        Ok(())
    }

    /// Drop any unread backlog left in the agent's WAL from a prior run.
    /// Safe to open transiently here: by the time `start` calls this, no
    /// engine process for this agent is running (checked just above), so
    /// the WAL's single-writer-per-process lock is free.
    fn clear_backlog(&self, agent_id: &AgentId, agent_dir: &std::path::Path) -> Result<(), SupervisorError> {
        let wal_path = agent_dir.join("wal.log");
        if !wal_path.exists() {
            return Ok(());
        }
        let store = qmon_storage::MessageStore::open(&wal_path, None, self.clock.clone())
            .map_err(|err| SupervisorError::Process(err.to_string()))?;
        store
            .clear_agent(agent_id.clone())
            .map_err(|err| SupervisorError::Process(err.to_string()))
    }

    /// Start (or idempotently refuse to double-start, I7) the engine for
    /// one agent. Clears its prior backlog and reaps any orphaned process
    /// from an earlier crashed supervisor before spawning.
    pub fn start(
        &self,
        config: &AgentConfig,
        handler_kind: HandlerKind,
        deployment_group: Option<String>,
    ) -> Result<MonitorId, SupervisorError> {
        if let Some(existing) = self.table.get(&config.agent_id) {
            if existing.is_running() && process::is_alive(existing.child_pid) {
                return Err(SupervisorError::AlreadyRunning(config.agent_id.clone()));
            }
        }

        let (transport_name, _) = config
            .primary_transport()
            .ok_or_else(|| SupervisorError::NoPrimaryTransport(config.agent_id.clone()))?;
        let transport_label = transport_name.as_str().to_string();

        self.reap_orphans_for(&config.agent_id)?;

        let agent_dir = self.agent_dir(&config.agent_id);
        std::fs::create_dir_all(&agent_dir)?;
        self.clear_backlog(&config.agent_id, &agent_dir)?;

        let log_path = agent_dir.join("engine.log");
        if log_path.exists() {
            if let Err(err) = std::fs::OpenOptions::new().write(true).truncate(true).open(&log_path) {
                tracing::warn!(agent = %config.agent_id, error = %err, "failed to rotate prior engine log");
            }
        }

        let handler_kind_json = serde_json::to_string(&handler_kind)
            .map_err(|err| SupervisorError::Process(err.to_string()))?;
        let spec = process::SpawnSpec {
            exe: &self.engine_exe,
            agent_id: config.agent_id.as_str(),
            config_dir: &self.config_dir,
            data_dir: &self.data_dir,
            log_path: &log_path,
            handler_kind_json: &handler_kind_json,
        };
        let child_pid =
            process::spawn_engine(&spec).map_err(|err| SupervisorError::Process(err.to_string()))?;

        let record = MonitorRecord {
            monitor_id: MonitorId::new(),
            agent_id: config.agent_id.clone(),
            handler_kind,
            transport_label,
            supervisor_instance_id: self.supervisor_instance_id,
            child_pid,
            started_at_ms: self.clock.epoch_ms(),
            stopped_at_ms: None,
            state: MonitorState::Running,
            log_path,
            deployment_group,
        };
        let monitor_id = record.monitor_id;
        self.table.upsert(record).map_err(|err| SupervisorError::Process(err.to_string()))?;
        Ok(monitor_id)
    }

    /// Cooperative shutdown (SIGTERM, then SIGKILL after a grace period).
    /// Idempotent: stopping an already-stopped monitor is a no-op.
    pub async fn stop(&self, monitor_id: MonitorId) -> Result<(), SupervisorError> {
        let Some(mut record) = self.table.find(monitor_id) else {
            return Err(SupervisorError::UnknownMonitor(monitor_id));
        };
        if !record.is_running() {
            return Ok(());
        }

        process::stop_gracefully(record.child_pid)
            .await
            .map_err(|err| SupervisorError::Process(err.to_string()))?;
        record.state = MonitorState::Stopped;
        record.stopped_at_ms = Some(self.clock.epoch_ms());
        self.table.upsert(record).map_err(|err| SupervisorError::Process(err.to_string()))?;
        Ok(())
    }

    /// Immediate hard kill, no grace period.
    pub fn kill(&self, monitor_id: MonitorId) -> Result<(), SupervisorError> {
        let Some(mut record) = self.table.find(monitor_id) else {
            return Err(SupervisorError::UnknownMonitor(monitor_id));
        };
        if record.is_running() {
            process::hard_kill(record.child_pid)
                .map_err(|err| SupervisorError::Process(err.to_string()))?;
        }
        record.state = MonitorState::Stopped;
        record.stopped_at_ms.get_or_insert(self.clock.epoch_ms());
        self.table.upsert(record).map_err(|err| SupervisorError::Process(err.to_string()))?;
        Ok(())
    }

    pub async fn restart(
        &self,
        monitor_id: MonitorId,
        config: &AgentConfig,
    ) -> Result<MonitorId, SupervisorError> {
        let Some(record) = self.table.find(monitor_id) else {
            return Err(SupervisorError::UnknownMonitor(monitor_id));
        };
        self.stop(monitor_id).await?;
        self.start(config, record.handler_kind, record.deployment_group)
    }

    /// Remove a stopped monitor's record. Refuses while it's still running.
    pub fn delete(&self, monitor_id: MonitorId) -> Result<(), SupervisorError> {
        let Some(record) = self.table.find(monitor_id) else {
            return Err(SupervisorError::UnknownMonitor(monitor_id));
        };
        if record.is_running() {
            return Err(SupervisorError::Process(format!(
                "monitor {monitor_id} is still running; stop it first"
            )));
        }
        self.table
            .remove(&record.agent_id)
            .map_err(|err| SupervisorError::Process(err.to_string()))?;
        Ok(())
    }

    /// Tracked monitors, self-healing any record that claims to be running
    /// but whose pid has died without the supervisor noticing.
    pub fn list(&self) -> Vec<MonitorRecord> {
        let mut records = self.table.all();
        for record in &mut records {
            if record.is_running() && !process::is_alive(record.child_pid) {
                record.state = MonitorState::Stopped;
                record.stopped_at_ms.get_or_insert(self.clock.epoch_ms());
                let _ = self.table.upsert(record.clone());
            }
        }
        records
    }

    /// [`Self::list`] plus any live engine process found by scanning `/proc`
    /// that this supervisor instance never recorded (spec.md §4.6 `list()`:
    /// "merges in-memory records with a live OS scan").
    pub fn list_including_orphans(&self) -> Vec<MonitorRecord> {
        let mut records = self.list();
        let tracked_pids: Vec<u32> = records.iter().map(|r| r.child_pid).collect();
        let observed = orphan::scan_engine_processes();

        for candidate in orphan::orphans_among(observed, &tracked_pids) {
            let Ok(agent_id) = AgentId::parse(&candidate.agent_id) else { continue };
            records.push(MonitorRecord {
                monitor_id: MonitorId::new(),
                agent_id,
                handler_kind: HandlerKind::Echo,
                transport_label: "unknown".to_string(),
                supervisor_instance_id: SupervisorInstanceId::new(),
                child_pid: candidate.pid,
                started_at_ms: 0,
                stopped_at_ms: None,
                state: MonitorState::Running,
                log_path: PathBuf::new(),
                deployment_group: None,
            });
        }
        records
    }

    /// Activates the kill switch, hard-kills every process this supervisor
    /// knows about (tracked or orphaned), and clears the record set. The
    /// kill switch stays active until explicitly deactivated.
    pub fn kill_all_and_clear(&self) -> Result<(), SupervisorError> {
        self.kill_switch.activate();

        for record in self.table.all() {
            if record.is_running() {
                let _ = process::hard_kill(record.child_pid);
            }
        }
        for candidate in orphan::scan_engine_processes() {
            let _ = process::hard_kill(candidate.pid);
        }

        self.table.clear().map_err(|err| SupervisorError::Process(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
