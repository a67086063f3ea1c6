// SPDX-License-Identifier: MIT

//! Deployment groups: named sets of agents the Supervisor starts together
//! (spec.md §4.6, final paragraph).

use crate::agent::AgentId;
use crate::monitor::HandlerKind;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeploymentGroupEntry {
    pub agent_id: AgentId,
    pub handler_kind: HandlerKind,
    #[serde(default)]
    pub params: serde_json::Value,
    /// Seconds to wait before starting this entry, relative to the previous one.
    #[serde(default)]
    pub start_delay_secs: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeploymentGroup {
    pub id: String,
    pub entries: Vec<DeploymentGroupEntry>,
}
