// SPDX-License-Identifier: MIT

//! Task C: the per-agent processing loop — kill switch, pause/resume,
//! dequeue, handle, reply, self-throttle, mark processed (spec.md §4.4
//! "Task C", steps 1-9).

use crate::handler::{IncomingMessage, MessageHandler};
use crate::self_throttle;
use qmon_core::{AgentId, Clock, KillSwitch};
use qmon_storage::MessageStore;
use qmon_wire::MessageTransport;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// How long to sleep when there is nothing to do (spec.md §4.4 Task C
    /// step 3 default).
    pub poll_interval: Duration,
    /// How long to sleep between kill-switch/pause checks while blocked.
    pub idle_back_off: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(1), idle_back_off: Duration::from_millis(200) }
    }
}

pub async fn run<C: Clock>(
    agent_id: AgentId,
    transport: Arc<dyn MessageTransport>,
    store: Arc<MessageStore<C>>,
    handler: Arc<dyn MessageHandler>,
    clock: C,
    kill_switch: Arc<dyn KillSwitch>,
    config: ProcessorConfig,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            return;
        }

        // The store's own toggle only reaches Processors inside this one
        // process; `kill_switch` is the cross-process signal the Supervisor
        // actually flips (spec.md §6.4).
        if kill_switch.is_active() || store.kill_switch_active() {
            if sleep_or_cancel(config.idle_back_off, &cancel).await {
                return;
            }
            continue;
        }

        if let Err(err) = store.check_auto_resume() {
            tracing::warn!(agent = %agent_id, error = %err, "auto-resume check failed");
        }

        if store.get_status(&agent_id).is_paused() {
            if sleep_or_cancel(config.idle_back_off, &cancel).await {
                return;
            }
            continue;
        }

        let Some(row) = store.peek_pending(&agent_id).into_iter().next() else {
            if sleep_or_cancel(config.poll_interval, &cancel).await {
                return;
            }
            continue;
        };

        if let Err(err) = store.mark_processing(row.id.clone(), row.agent.clone()) {
            tracing::warn!(agent = %agent_id, id = %row.id, error = %err, "mark_processing failed");
        }

        let incoming = IncomingMessage {
            id: row.id.clone(),
            sender: row.sender.clone(),
            content: row.content.clone(),
            enqueued_at_ms: row.enqueued_at_ms,
        };
        let reply = handler.handle(incoming).await;

        if !reply.is_empty() {
            dispatch_reply(&agent_id, &transport, &store, &clock, &row.id, &reply).await;
        }

        if let Err(err) = store.mark_processed(row.id.clone(), row.agent.clone()) {
            tracing::warn!(agent = %agent_id, id = %row.id, error = %err, "mark_processed failed");
        }
    }
}

async fn dispatch_reply<C: Clock>(
    agent_id: &AgentId,
    transport: &Arc<dyn MessageTransport>,
    store: &Arc<MessageStore<C>>,
    clock: &C,
    parent_message_id: &qmon_core::MessageId,
    reply: &str,
) {
    let stripped = self_throttle::strip_self_mention(reply, agent_id);

    if let Err(err) = transport.send(&stripped, Some(parent_message_id.as_str())).await {
        tracing::warn!(agent = %agent_id, id = %parent_message_id, error = %err, "reply send failed");
    }

    // Self-throttle (spec.md §4.4 step 7) is detected from the original
    // reply, before the self-mention was stripped for sending.
    if let Some(command) = self_throttle::detect_command(reply, clock.epoch_ms()) {
        if let Err(err) = store.pause(agent_id.clone(), command.reason, command.resume_at_ms) {
            tracing::warn!(agent = %agent_id, error = %err, "failed to record self-pause");
        }
    }
}

/// Sleeps `duration` unless cancelled first. Returns `true` if cancelled.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = tokio::time::sleep(duration) => false,
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
