// SPDX-License-Identifier: MIT

//! How to open one transport session (spec.md §3 `TransportSpec`).

use std::collections::BTreeMap;

/// Declaration-order name of a transport within an [`AgentConfig`](crate::config::AgentConfig).
pub type TransportName = String;

/// The conventional transport label treated as primary when present,
/// regardless of declaration order (spec.md §3).
pub const CONVENTIONAL_PRIMARY_LABEL: &str = "messaging";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransportSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl TransportSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), args: Vec::new(), env: BTreeMap::new() }
    }

    /// A transport is remote iff its spec encodes a networked endpoint,
    /// recognized either by an env/arg value containing `://` or by the
    /// conventional `url` env key (spec.md §4.5).
    pub fn is_remote(&self) -> bool {
        self.env.get("url").is_some_and(|v| v.contains("://"))
            || self.args.iter().any(|a| a.contains("://"))
            || self.env.values().any(|v| v.contains("://"))
    }

    /// Extract an `agent_id` from a `.../agents/<agent_id>` URL if this
    /// spec's env carries one (spec.md §3, §6.3).
    pub fn agent_id_from_url(&self) -> Option<String> {
        self.env
            .values()
            .chain(self.args.iter())
            .find_map(|v| v.split("/agents/").nth(1))
            .map(|tail| tail.split(['/', '?', '#']).next().unwrap_or(tail).to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[path = "transport_spec_tests.rs"]
mod tests;
