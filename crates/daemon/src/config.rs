// SPDX-License-Identifier: MIT

//! Loading [`AgentConfig`] descriptors from TOML files (spec.md §6.3).

use qmon_core::{AgentConfig, AgentId, InvalidAgentId, TransportSpec};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
    #[error("{path}: no transport declared")]
    NoTransport { path: PathBuf },
    #[error("{path}: agent_id could not be determined (no explicit agent_id and no .../agents/<id> URL in any transport)")]
    MissingAgentId { path: PathBuf },
    #[error("{path}: {source}")]
    InvalidAgentId { path: PathBuf, #[source] source: InvalidAgentId },
}

/// On-disk shape: identical to [`AgentConfig`] except `agent_id` is
/// optional — the file name is never authoritative (spec.md §6.3). The
/// primary transport's URL is always authoritative when one is
/// derivable; `agent_id` here is consulted only as a fallback for
/// transports with no derivable URL at all (e.g. `command = "local"`),
/// never as an override of a URL-derived id.
#[derive(Debug, serde::Deserialize)]
struct RawAgentConfig {
    agent_id: Option<String>,
    transports: IndexMap<String, TransportSpec>,
    #[serde(default)]
    permissions: serde_json::Value,
    #[serde(default)]
    handler_params: serde_json::Value,
}

/// Parses one agent config file, deriving `agent_id` from the primary
/// transport's `.../agents/<agent_id>` URL when the file omits it.
pub fn load_agent_config(path: &Path) -> Result<AgentConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let raw: RawAgentConfig =
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    let primary = raw
        .transports
        .iter()
        .find(|(name, _)| name.as_str() == qmon_core::CONVENTIONAL_PRIMARY_LABEL)
        .or_else(|| raw.transports.iter().next())
        .ok_or_else(|| ConfigError::NoTransport { path: path.to_path_buf() })?;

    let agent_id = match primary.1.agent_id_from_url() {
        Some(id) => id,
        None => raw.agent_id.ok_or_else(|| ConfigError::MissingAgentId { path: path.to_path_buf() })?,
    };
    let agent_id = AgentId::parse(&agent_id)
        .map_err(|source| ConfigError::InvalidAgentId { path: path.to_path_buf(), source })?;

    Ok(AgentConfig {
        agent_id,
        transports: raw.transports,
        permissions: raw.permissions,
        handler_params: raw.handler_params,
    })
}

/// Loads every `*.toml` file in `dir`. A malformed or unresolvable file is
/// skipped with a warning rather than failing the whole load (spec.md §6.3).
pub fn load_agent_configs_from_dir(dir: &Path) -> Vec<AgentConfig> {
    let mut configs = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "failed to read agent config directory");
            return configs;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        match load_agent_config(&path) {
            Ok(config) => configs.push(config),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "skipping agent config"),
        }
    }

    configs
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
