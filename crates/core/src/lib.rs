// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qmon-core: shared domain types for the agent-mention queue engine and
//! its supervisor.

pub mod macros;

pub mod agent;
pub mod agent_status;
pub mod clock;
pub mod config;
pub mod deployment;
pub mod error;
pub mod event;
pub mod id;
pub mod kill_switch;
pub mod message;
pub mod monitor;
pub mod transport_spec;

pub use agent::{AgentId, InvalidAgentId};
pub use agent_status::{AgentLifecycle, AgentStatus, DONE_PREFIX};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::AgentConfig;
pub use deployment::{DeploymentGroup, DeploymentGroupEntry};
pub use error::SupervisorError;
pub use event::Event;
pub use id::short;
pub use kill_switch::{KillSwitch, MemoryKillSwitch};
pub use message::{MessageId, StoredMessage};
pub use monitor::{HandlerKind, MonitorId, MonitorRecord, MonitorState, SupervisorInstanceId};
pub use transport_spec::{TransportName, TransportSpec, CONVENTIONAL_PRIMARY_LABEL};
