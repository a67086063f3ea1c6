// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage for the agent-mention queue: an append-only event log,
//! the materialized state it replays into, and the [`MessageStore`] facade
//! the engine talks to.

pub mod migration;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod wal;

pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{SnapshotError, SNAPSHOT_VERSION};
pub use state::MaterializedState;
pub use store::{MessageStore, StoreError};
pub use wal::{Wal, WalEntry, WalError};
