// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Concrete [`MessageTransport`](qmon_wire::MessageTransport) sessions and
//! the manager that opens/selects/tears them down for one agent.

pub mod local_transport;
pub mod stdio_transport;
pub mod transport_manager;

pub use local_transport::{LocalTransport, SentMessage};
pub use stdio_transport::StdioTransport;
pub use transport_manager::TransportManager;
