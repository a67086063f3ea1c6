// SPDX-License-Identifier: MIT

//! Resolved agent configuration (spec.md §3 `AgentConfig`, §6.3).

use crate::agent::AgentId;
use crate::transport_spec::{TransportName, TransportSpec, CONVENTIONAL_PRIMARY_LABEL};
use indexmap::IndexMap;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AgentConfig {
    pub agent_id: AgentId,
    /// Declaration-ordered; the first entry whose name matches the
    /// conventional `"messaging"` label is primary, otherwise the first
    /// entry (spec.md §3).
    pub transports: IndexMap<TransportName, TransportSpec>,
    #[serde(default)]
    pub permissions: serde_json::Value,
    #[serde(default)]
    pub handler_params: serde_json::Value,
}

impl AgentConfig {
    pub fn primary_transport(&self) -> Option<(&TransportName, &TransportSpec)> {
        self.transports
            .iter()
            .find(|(name, _)| name.as_str() == CONVENTIONAL_PRIMARY_LABEL)
            .or_else(|| self.transports.iter().next())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
