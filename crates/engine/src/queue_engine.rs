// SPDX-License-Identifier: MIT

//! [`QueueEngine`]: wires the Poller/Heartbeat/Processor triad for one
//! agent under a single cancellation scope (spec.md §4.4, §5). The
//! per-agent `running ⇄ paused` half of the state machine lives in the
//! store's [`AgentStatus`](qmon_core::AgentStatus); this type only tracks
//! the coarse engine lifecycle around it.

use crate::handler::MessageHandler;
use crate::{heartbeat, poller, processor};
use qmon_adapters::TransportManager;
use qmon_core::{AgentConfig, Clock, KillSwitch, MemoryKillSwitch};
use qmon_storage::MessageStore;
use qmon_wire::TransportError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default heartbeat interval (spec.md §5: "MUST be < 300 s").
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(240);

/// Coarse engine lifecycle (spec.md §4.4 state machine, engine-level half).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

#[derive(Clone)]
pub struct EngineConfig {
    pub poller: poller::PollerConfig,
    pub processor: processor::ProcessorConfig,
    pub heartbeat_interval: Duration,
    /// The fleet-wide signal a Supervisor running in a different process
    /// flips (spec.md §4.7). Defaults to an in-memory switch that is only
    /// useful for embedding multiple engines in one process/tests.
    pub kill_switch: Arc<dyn KillSwitch>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poller: poller::PollerConfig::default(),
            processor: processor::ProcessorConfig::default(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            kill_switch: Arc::new(MemoryKillSwitch::new()),
        }
    }
}

/// One agent's running engine: opens its transports, spawns the P/H/C
/// triad, and owns shutdown.
pub struct QueueEngine {
    transports: TransportManager,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    state: parking_lot::Mutex<EngineState>,
}

impl QueueEngine {
    pub async fn start<C: Clock>(
        config: &AgentConfig,
        store: Arc<MessageStore<C>>,
        handler: Arc<dyn MessageHandler>,
        clock: C,
        engine_config: EngineConfig,
    ) -> Result<Self, TransportError> {
        let state = parking_lot::Mutex::new(EngineState::Starting);
        let transports = TransportManager::open(config).await?;
        let cancel = CancellationToken::new();
        let mut tasks = Vec::new();

        for session in transports.remote_sessions() {
            let session = session.clone();
            let interval = engine_config.heartbeat_interval;
            let cancel = cancel.clone();
            tasks.push(tokio::spawn(heartbeat::run(session, interval, cancel)));
        }

        let primary = transports.primary().clone();

        tasks.push(tokio::spawn(poller::run(
            config.agent_id.clone(),
            primary.clone(),
            store.clone(),
            engine_config.poller,
            cancel.clone(),
        )));

        tasks.push(tokio::spawn(processor::run(
            config.agent_id.clone(),
            primary,
            store,
            handler,
            clock,
            engine_config.kill_switch,
            engine_config.processor,
            cancel.clone(),
        )));

        *state.lock() = EngineState::Running;
        Ok(Self { transports, cancel, tasks, state })
    }

    pub fn state(&self) -> EngineState {
        *self.state.lock()
    }

    /// Cooperative shutdown (spec.md §5 "Bounded shutdown"): cancel every
    /// task, wait for them to exit, then close transports in reverse order.
    pub async fn shutdown(mut self) {
        *self.state.lock() = EngineState::Stopping;
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        self.transports.close_all().await;
        *self.state.lock() = EngineState::Stopped;
    }
}

#[cfg(test)]
#[path = "queue_engine_tests.rs"]
mod tests;
