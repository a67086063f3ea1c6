// SPDX-License-Identifier: MIT

//! Starting a [`DeploymentGroup`] of agents in sequence (spec.md §4.6, final
//! paragraph: "a named, ordered list of agents to start together").

use crate::supervisor::Supervisor;
use qmon_core::{AgentConfig, Clock, DeploymentGroup, MonitorId, SupervisorError};
use std::time::Duration;

/// Start every entry in `group` in order, waiting `start_delay_secs`
/// between each one. `configs` resolves an entry's `agent_id` to its
/// loaded [`AgentConfig`]; an entry with no matching config is skipped
/// with a warning rather than aborting the whole group.
pub async fn start_group<C: Clock>(
    supervisor: &Supervisor<C>,
    group: &DeploymentGroup,
    configs: &[AgentConfig],
) -> Vec<Result<MonitorId, SupervisorError>> {
    let mut results = Vec::with_capacity(group.entries.len());

    for (index, entry) in group.entries.iter().enumerate() {
        if index > 0 && entry.start_delay_secs > 0 {
            tokio::time::sleep(Duration::from_secs(entry.start_delay_secs)).await;
        }

        let Some(config) = configs.iter().find(|c| c.agent_id == entry.agent_id) else {
            tracing::warn!(agent_id = %entry.agent_id, group = %group.id, "no config found for deployment group entry, skipping");
            continue;
        };

        let outcome = supervisor.start(config, entry.handler_kind.clone(), Some(group.id.clone()));
        if let Err(err) = &outcome {
            tracing::error!(agent_id = %entry.agent_id, group = %group.id, error = %err, "failed to start deployment group entry");
        }
        results.push(outcome);
    }

    results
}

#[cfg(test)]
#[path = "deployment_group_tests.rs"]
mod tests;
