// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `qmon-engine`: the per-agent Poller/Heartbeat/Processor triad
//! (spec.md §4.4, C5), the [`MessageHandler`] capability seam (§6.2), and
//! the reference [`EchoHandler`] implementation.

pub mod echo_handler;
pub mod handler;
pub mod heartbeat;
pub mod poller;
pub mod processor;
pub mod queue_engine;
pub mod self_throttle;

pub use echo_handler::{EchoHandler, ECHO_MARKER};
pub use handler::{IncomingMessage, MessageHandler};
pub use poller::PollerConfig;
pub use processor::ProcessorConfig;
pub use queue_engine::{EngineConfig, EngineState, QueueEngine, DEFAULT_HEARTBEAT_INTERVAL};
pub use self_throttle::{detect_command, strip_self_mention, ThrottleCommand, DONE_PAUSE_SECS};
