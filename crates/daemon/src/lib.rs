// SPDX-License-Identifier: MIT

//! `qmon-daemon`: the Supervisor that starts, stops, and tracks one
//! engine process per agent (spec.md §4.6), plus the configuration
//! loading, cross-process kill switch, and control-plane facade that
//! `qmon-cli` is built on.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod control_plane;
pub mod deployment_group;
pub mod kill_switch;
pub mod run_engine;
pub mod supervisor;

pub use config::{load_agent_config, load_agent_configs_from_dir, ConfigError};
pub use control_plane::{ControlPlane, ControlPlaneError, FleetStatus};
pub use kill_switch::FileKillSwitch;
pub use run_engine::RunEngineError;
pub use supervisor::process::RUN_ENGINE_SUBCOMMAND;
pub use supervisor::Supervisor;
