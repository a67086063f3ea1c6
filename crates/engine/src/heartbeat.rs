// SPDX-License-Identifier: MIT

//! Task H: periodic liveness ping bound to one transport session
//! (spec.md §4.3).

use qmon_wire::MessageTransport;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs until `cancel` fires. Sleeps `interval`, pings, logs, repeats;
/// individual ping failures only trigger a short back-off, never a stop.
/// `interval <= 0` disables the heartbeat entirely (spec.md §4.3).
pub async fn run(transport: Arc<dyn MessageTransport>, interval: Duration, cancel: CancellationToken) {
    if interval.is_zero() {
        return;
    }

    let back_off = Duration::from_secs(5).min(interval);
    let mut failures: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        match transport.send_ping().await {
            Ok(result) => {
                failures = 0;
                tracing::debug!(status = %result.status, "heartbeat ok");
            }
            Err(err) => {
                failures += 1;
                tracing::warn!(error = %err, failures, "heartbeat ping failed");
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(back_off) => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
