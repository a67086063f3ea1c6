// SPDX-License-Identifier: MIT

//! Task P: startup sweep + steady-state polling against the primary
//! transport, feeding parsed mentions into the durable store (spec.md
//! §4.4 "Task P").

use qmon_core::{AgentId, Clock};
use qmon_storage::MessageStore;
use qmon_wire::{mention, CheckMode, CheckOptions, MessageTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The mandatory inter-call delay during the startup sweep, bounding the
/// sweep rate to ≈ 85 req/min (spec.md §4.4 Task P step 1).
pub const SWEEP_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub startup_sweep: bool,
    pub sweep_limit: u32,
    pub mark_read: bool,
    /// Server-side wait budget for the steady-state blocking check.
    pub check_timeout_secs: u64,
    /// Back-off applied after a transport error before retrying.
    pub error_back_off: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            startup_sweep: true,
            sweep_limit: 10,
            mark_read: false,
            check_timeout_secs: 30,
            error_back_off: Duration::from_secs(1),
        }
    }
}

pub async fn run<C: Clock>(
    agent_id: AgentId,
    transport: Arc<dyn MessageTransport>,
    store: Arc<MessageStore<C>>,
    config: PollerConfig,
    cancel: CancellationToken,
) {
    if config.startup_sweep {
        sweep(&agent_id, &transport, &store, &config, &cancel).await;
    }

    loop {
        if cancel.is_cancelled() {
            return;
        }

        let options = CheckOptions {
            wait: true,
            mark_read: config.mark_read,
            mode: CheckMode::Unread,
            limit: 1,
            timeout_secs: config.check_timeout_secs,
            filter_agent: None,
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            result = transport.check(&options) => result,
        };

        match outcome {
            Ok(payload) => {
                ingest(&agent_id, &payload, &store);
            }
            Err(err) => {
                tracing::warn!(agent = %agent_id, error = %err, "poll failed, backing off");
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(config.error_back_off) => {}
                }
            }
        }
    }
}

/// Catch-up pass against the unread queue: up to `sweep_limit` iterations,
/// one mention per call, stopping early when the transport has nothing
/// left (spec.md §4.4 Task P step 1).
async fn sweep<C: Clock>(
    agent_id: &AgentId,
    transport: &Arc<dyn MessageTransport>,
    store: &Arc<MessageStore<C>>,
    config: &PollerConfig,
    cancel: &CancellationToken,
) {
    let options = CheckOptions {
        wait: false,
        mark_read: true,
        mode: CheckMode::Unread,
        limit: 1,
        timeout_secs: config.check_timeout_secs,
        filter_agent: None,
    };

    for _ in 0..config.sweep_limit {
        if cancel.is_cancelled() {
            return;
        }

        match transport.check(&options).await {
            Ok(payload) => {
                if matches!(ingest(agent_id, &payload, store), IngestOutcome::NoMention) {
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(agent = %agent_id, error = %err, "startup sweep call failed");
                return;
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(SWEEP_DELAY) => {}
        }
    }
}

/// Outcome of a single [`ingest`] call. The sweep only stops on
/// `NoMention` — a transient `store.put` rejection is logged and the
/// sweep keeps consuming the backlog (spec.md §4.4 Task P: "transient
/// storage errors on `put` return rejected and the caller MAY retry; the
/// poller treats rejection as a warning and continues").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IngestOutcome {
    /// The payload wasn't a mention at all (empty/self/status payload).
    NoMention,
    /// A mention was parsed and durably stored.
    Stored,
    /// A mention was parsed but the store rejected it.
    Rejected,
}

/// Parses `payload` and stores a mention if one was found.
fn ingest<C: Clock>(agent_id: &AgentId, payload: &qmon_wire::Payload, store: &Arc<MessageStore<C>>) -> IngestOutcome {
    let Some(canonical) = mention::parse(agent_id, payload) else {
        return IngestOutcome::NoMention;
    };

    match store.put(canonical.id.clone(), agent_id.clone(), canonical.sender.clone(), canonical.content.clone()) {
        Ok(()) => IngestOutcome::Stored,
        Err(err) => {
            tracing::warn!(agent = %agent_id, error = %err, "mention rejected by store, continuing");
            IngestOutcome::Rejected
        }
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
