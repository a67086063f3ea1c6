// SPDX-License-Identifier: MIT

//! An in-process [`MessageTransport`] with no child process and no
//! network — the primary fixture for engine tests, and a legitimate
//! "local" session kind for an agent config that needs no external
//! messaging service (spec.md §4.5: "a session is remote iff...").

use async_trait::async_trait;
use parking_lot::Mutex;
use qmon_wire::{Ack, CheckOptions, MessageTransport, Payload, PingResult, TransportError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub content: String,
    pub parent_message_id: Option<String>,
}

#[derive(Clone, Default)]
pub struct LocalTransport {
    inbox: Arc<Mutex<VecDeque<Payload>>>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    /// Wakes a blocked `check(wait=true)` as soon as a payload is pushed;
    /// a push that lands before anyone is waiting leaves a permit behind
    /// (`Notify`'s single-permit semantics), so no wakeup is ever lost.
    arrived: Arc<Notify>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a payload to be returned by the next `check()` call.
    pub fn push_incoming(&self, payload: Payload) {
        self.inbox.lock().push_back(payload);
        self.arrived.notify_one();
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MessageTransport for LocalTransport {
    async fn send(&self, content: &str, parent_message_id: Option<&str>) -> Result<Ack, TransportError> {
        self.sent.lock().push(SentMessage {
            content: content.to_string(),
            parent_message_id: parent_message_id.map(str::to_string),
        });
        Ok(Ack { accepted: true, detail: None })
    }

    async fn check(&self, options: &CheckOptions) -> Result<Payload, TransportError> {
        if let Some(payload) = self.inbox.lock().pop_front() {
            return Ok(payload);
        }
        if options.wait {
            let notified = self.arrived.notified();
            tokio::select! {
                _ = notified => {}
                _ = tokio::time::sleep(Duration::from_secs(options.timeout_secs)) => {}
            }
        }
        Ok(self.inbox.lock().pop_front().unwrap_or_else(|| Payload::Text("No mentions".to_string())))
    }

    async fn send_ping(&self) -> Result<PingResult, TransportError> {
        Ok(PingResult { status: "ok".to_string(), timestamp_ms: 0 })
    }

    fn is_remote(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "local_transport_tests.rs"]
mod tests;
