// SPDX-License-Identifier: MIT

//! A [`MessageTransport`] backed by a child process speaking
//! length-prefixed JSON over stdin/stdout (spec.md §4.5, §9 "Session
//! initialisation"). This is the concrete realisation of a remote
//! transport session: the launcher command in a `TransportSpec` is
//! spawned once and every `send`/`check`/`send_ping` round-trips a
//! request/response pair across its pipes.

use async_trait::async_trait;
use qmon_core::TransportSpec;
use qmon_wire::framing::{read_envelope, write_envelope, ProtocolError};
use qmon_wire::{Ack, CheckOptions, MessageTransport, Payload, PingResult, TransportError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::sync::Mutex;

/// Client-side slack layered on top of a request's own `timeout_secs`, so
/// the client always times out strictly after the server-side wait could
/// have (spec.md §6.1: "client-side timeout >= server-side timeout + small
/// slack").
const TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Client-side timeout for requests with no server-side wait budget of
/// their own (`send`, `send_ping`).
const DEFAULT_ROUNDTRIP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum StdioRequest {
    Send { content: String, parent_message_id: Option<String> },
    Check { options: CheckOptions },
    Ping,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StdioResponse {
    Ack(Ack),
    Payload(Payload),
    Ping(PingResult),
    Error(String),
}

impl From<ProtocolError> for TransportError {
    fn from(err: ProtocolError) -> Self {
        TransportError::Malformed(err.to_string())
    }
}

pub struct StdioTransport {
    remote: bool,
    /// The whole request/response round trip is serialised behind one
    /// lock: the engine only ever has one in-flight operation per
    /// transport session (spec.md §4.4/§4.5), so there is nothing to gain
    /// from pipelining concurrent requests onto the same pipe.
    io: Mutex<(BufWriter<ChildStdin>, BufReader<ChildStdout>)>,
    child: Mutex<Child>,
}

impl StdioTransport {
    pub async fn spawn(spec: &TransportSpec) -> Result<Self, TransportError> {
        let mut command = tokio::process::Command::new(&spec.command);
        command
            .args(&spec.args)
            .envs(&spec.env)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| TransportError::Unavailable(e.to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| TransportError::Unavailable("no stdin".to_string()))?;
        let stdout = child.stdout.take().ok_or_else(|| TransportError::Unavailable("no stdout".to_string()))?;

        Ok(Self {
            remote: spec.is_remote(),
            io: Mutex::new((BufWriter::new(stdin), BufReader::new(stdout))),
            child: Mutex::new(child),
        })
    }

    async fn roundtrip(&self, request: StdioRequest, timeout: Duration) -> Result<StdioResponse, TransportError> {
        tokio::time::timeout(timeout, async {
            let mut guard = self.io.lock().await;
            let (writer, reader) = &mut *guard;
            write_envelope(writer, &request).await?;
            let response: StdioResponse = read_envelope(reader).await?;
            Ok(response)
        })
        .await
        .unwrap_or(Err(TransportError::TimedOut))
    }

    /// Best-effort termination of the launcher process (used by
    /// `TransportManager` teardown).
    pub async fn terminate(&self) {
        let _ = self.child.lock().await.kill().await;
    }
}

#[async_trait]
impl MessageTransport for StdioTransport {
    async fn send(&self, content: &str, parent_message_id: Option<&str>) -> Result<Ack, TransportError> {
        let request =
            StdioRequest::Send { content: content.to_string(), parent_message_id: parent_message_id.map(str::to_string) };
        match self.roundtrip(request, DEFAULT_ROUNDTRIP_TIMEOUT).await? {
            StdioResponse::Ack(ack) => Ok(ack),
            StdioResponse::Error(msg) => Err(TransportError::Malformed(msg)),
            _ => Err(TransportError::Malformed("unexpected response to send".to_string())),
        }
    }

    async fn check(&self, options: &CheckOptions) -> Result<Payload, TransportError> {
        let timeout = Duration::from_secs(options.timeout_secs) + TIMEOUT_SLACK;
        match self.roundtrip(StdioRequest::Check { options: options.clone() }, timeout).await? {
            StdioResponse::Payload(payload) => Ok(payload),
            StdioResponse::Error(msg) => Err(TransportError::Malformed(msg)),
            _ => Err(TransportError::Malformed("unexpected response to check".to_string())),
        }
    }

    async fn send_ping(&self) -> Result<PingResult, TransportError> {
        match self.roundtrip(StdioRequest::Ping, DEFAULT_ROUNDTRIP_TIMEOUT).await? {
            StdioResponse::Ping(result) => Ok(result),
            StdioResponse::Error(msg) => Err(TransportError::Malformed(msg)),
            _ => Err(TransportError::Malformed("unexpected response to ping".to_string())),
        }
    }

    fn is_remote(&self) -> bool {
        self.remote
    }

    async fn close(&self) {
        self.terminate().await;
    }
}

#[cfg(test)]
#[path = "stdio_transport_tests.rs"]
mod tests;
