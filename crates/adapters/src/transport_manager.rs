// SPDX-License-Identifier: MIT

//! Opens every transport an [`AgentConfig`] declares, in declaration
//! order, and picks the primary session (spec.md §4.5).

use crate::local_transport::LocalTransport;
use crate::stdio_transport::StdioTransport;
use qmon_core::{AgentConfig, TransportName};
use qmon_wire::{MessageTransport, TransportError};
use std::sync::Arc;

/// A launcher command of exactly `"local"` opens an in-process
/// [`LocalTransport`] instead of spawning a child — used for agents that
/// need no external messaging service, and for tests.
const LOCAL_LAUNCHER: &str = "local";

struct OpenSession {
    name: TransportName,
    transport: Arc<dyn MessageTransport>,
}

pub struct TransportManager {
    sessions: Vec<OpenSession>,
    primary_index: usize,
}

impl TransportManager {
    pub async fn open(config: &AgentConfig) -> Result<Self, TransportError> {
        let primary_name = config
            .primary_transport()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| TransportError::Unavailable("agent config has no transports".to_string()))?;

        let mut sessions = Vec::new();
        for (name, spec) in &config.transports {
            let opened: Result<Arc<dyn MessageTransport>, TransportError> = if spec.command == LOCAL_LAUNCHER {
                Ok(Arc::new(LocalTransport::new()))
            } else {
                StdioTransport::spawn(spec).await.map(|t| Arc::new(t) as Arc<dyn MessageTransport>)
            };

            match opened {
                Ok(transport) => sessions.push(OpenSession { name: name.clone(), transport }),
                Err(err) if *name == primary_name => return Err(err),
                Err(err) => {
                    tracing::warn!(transport = %name, error = %err, "failed to open transport, skipping");
                }
            }
        }

        let primary_index = sessions
            .iter()
            .position(|s| s.name == primary_name)
            .ok_or_else(|| TransportError::Unavailable(format!("primary transport {primary_name} never opened")))?;

        Ok(Self { sessions, primary_index })
    }

    pub fn primary(&self) -> &Arc<dyn MessageTransport> {
        &self.sessions[self.primary_index].transport
    }

    /// Sessions that need a [`Heartbeat`](qmon_wire) — only the remote ones
    /// (spec.md §4.5).
    pub fn remote_sessions(&self) -> impl Iterator<Item = &Arc<dyn MessageTransport>> {
        self.sessions.iter().filter(|s| s.transport.is_remote()).map(|s| &s.transport)
    }

    /// Close every session in the reverse of open order.
    pub async fn close_all(&self) {
        for session in self.sessions.iter().rev() {
            session.transport.close().await;
        }
    }
}

#[cfg(test)]
#[path = "transport_manager_tests.rs"]
mod tests;
