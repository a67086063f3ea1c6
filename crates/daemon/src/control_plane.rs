// SPDX-License-Identifier: MIT

//! Thin facade the `qmon-cli` subcommands call into (spec.md §6.7): no
//! HTTP/web-socket layer, just Rust calls over the [`Supervisor`].

use crate::config;
use crate::supervisor::Supervisor;
use qmon_core::{
    AgentConfig, AgentId, Clock, DeploymentGroup, HandlerKind, KillSwitch as _, MonitorId,
    MonitorRecord, SupervisorError,
};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ControlPlaneError {
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
    #[error("no agent config named {0} found under the config directory")]
    UnknownAgent(AgentId),
}

/// A snapshot suitable for the `status` subcommand.
#[derive(Debug, Clone)]
pub struct FleetStatus {
    pub kill_switch_active: bool,
    pub running_count: usize,
    pub total_count: usize,
}

pub struct ControlPlane<C: Clock> {
    supervisor: Supervisor<C>,
    config_dir: PathBuf,
}

impl<C: Clock> ControlPlane<C> {
    pub fn new(supervisor: Supervisor<C>, config_dir: PathBuf) -> Self {
        Self { supervisor, config_dir }
    }

    fn load_config(&self, agent_id: &AgentId) -> Result<AgentConfig, ControlPlaneError> {
        config::load_agent_configs_from_dir(&self.config_dir)
            .into_iter()
            .find(|c| &c.agent_id == agent_id)
            .ok_or_else(|| ControlPlaneError::UnknownAgent(agent_id.clone()))
    }

    pub fn start(
        &self,
        agent_id: &AgentId,
        handler_kind: HandlerKind,
    ) -> Result<MonitorId, ControlPlaneError> {
        let config = self.load_config(agent_id)?;
        Ok(self.supervisor.start(&config, handler_kind, None)?)
    }

    pub async fn stop(&self, monitor_id: MonitorId) -> Result<(), ControlPlaneError> {
        Ok(self.supervisor.stop(monitor_id).await?)
    }

    pub async fn restart(&self, monitor_id: MonitorId) -> Result<MonitorId, ControlPlaneError> {
        let record = self
            .supervisor
            .list()
            .into_iter()
            .find(|r| r.monitor_id == monitor_id)
            .ok_or(SupervisorError::UnknownMonitor(monitor_id))?;
        let config = self.load_config(&record.agent_id)?;
        Ok(self.supervisor.restart(monitor_id, &config).await?)
    }

    pub fn kill(&self, monitor_id: MonitorId) -> Result<(), ControlPlaneError> {
        Ok(self.supervisor.kill(monitor_id)?)
    }

    pub fn delete(&self, monitor_id: MonitorId) -> Result<(), ControlPlaneError> {
        Ok(self.supervisor.delete(monitor_id)?)
    }

    pub fn list(&self) -> Vec<MonitorRecord> {
        self.supervisor.list_including_orphans()
    }

    pub fn kill_all(&self) -> Result<(), ControlPlaneError> {
        Ok(self.supervisor.kill_all_and_clear()?)
    }

    pub fn status(&self) -> FleetStatus {
        let records = self.supervisor.list();
        FleetStatus {
            kill_switch_active: self.supervisor.kill_switch().is_active(),
            running_count: records.iter().filter(|r| r.is_running()).count(),
            total_count: records.len(),
        }
    }

    pub async fn start_group(
        &self,
        group: &DeploymentGroup,
    ) -> Vec<Result<MonitorId, SupervisorError>> {
        let configs = config::load_agent_configs_from_dir(&self.config_dir);
        crate::deployment_group::start_group(&self.supervisor, group, &configs).await
    }
}

#[cfg(test)]
#[path = "control_plane_tests.rs"]
mod tests;
