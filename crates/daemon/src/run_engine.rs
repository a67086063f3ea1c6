// SPDX-License-Identifier: MIT

//! The real entrypoint for one agent's engine, run by the `qmon-cli`
//! hidden `__run-engine` subcommand that [`crate::supervisor::process`]
//! spawns (spec.md §4.6, §6.8). This module owns opening the agent's store
//! and transports and running until asked to shut down; it knows nothing
//! about being a CLI subcommand.

use crate::config;
use crate::kill_switch::FileKillSwitch;
use qmon_core::{AgentId, HandlerKind, SystemClock};
use qmon_engine::{EchoHandler, EngineConfig, MessageHandler, QueueEngine};
use qmon_storage::MessageStore;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RunEngineError {
    #[error("no agent config named {0} found under the config directory")]
    UnknownAgent(AgentId),
    #[error("handler {0} is not implemented in this build")]
    UnsupportedHandler(HandlerKind),
    #[error(transparent)]
    Store(#[from] qmon_storage::StoreError),
    #[error(transparent)]
    Transport(#[from] qmon_wire::TransportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Only [`HandlerKind::Echo`] ships a concrete implementation (spec.md §1
/// non-goal: "concrete LLM handlers/tool adapters"). `Local`/`Remote` are
/// modeled in the data so a host application can extend this function.
fn build_handler(kind: &HandlerKind) -> Result<Arc<dyn MessageHandler>, RunEngineError> {
    match kind {
        HandlerKind::Echo => Ok(Arc::new(EchoHandler)),
        other => Err(RunEngineError::UnsupportedHandler(other.clone())),
    }
}

/// Run one agent's engine until `shutdown_signal` resolves, then shut down
/// cooperatively. The caller supplies the signal (normally a SIGTERM
/// listener) so this function stays testable without real signals.
pub async fn run(
    agent_id: &AgentId,
    config_dir: &Path,
    data_dir: &Path,
    handler_kind: &HandlerKind,
    shutdown_signal: impl Future<Output = ()>,
) -> Result<(), RunEngineError> {
    let agent_config = config::load_agent_configs_from_dir(config_dir)
        .into_iter()
        .find(|c| &c.agent_id == agent_id)
        .ok_or_else(|| RunEngineError::UnknownAgent(agent_id.clone()))?;

    let handler = build_handler(handler_kind)?;

    let agent_dir = data_dir.join(agent_id.as_str());
    std::fs::create_dir_all(&agent_dir)?;
    let store = Arc::new(MessageStore::open(agent_dir.join("wal.log"), None, SystemClock)?);

    let engine_config =
        EngineConfig { kill_switch: Arc::new(FileKillSwitch::new(data_dir)), ..EngineConfig::default() };

    let engine = QueueEngine::start(&agent_config, store, handler, SystemClock, engine_config).await?;

    tracing::info!(agent_id = %agent_id, "engine started");
    shutdown_signal.await;
    tracing::info!(agent_id = %agent_id, "shutdown signal received, draining");
    engine.shutdown().await;
    Ok(())
}

#[cfg(test)]
#[path = "run_engine_tests.rs"]
mod tests;
