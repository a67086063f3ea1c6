// SPDX-License-Identifier: MIT

//! Periodic snapshots of [`MaterializedState`] so restart doesn't always
//! require a full WAL replay from seq 0.

use crate::migration::{MigrationError, MigrationRegistry};
use crate::state::MaterializedState;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),
}

pub fn write(path: impl AsRef<Path>, state: &MaterializedState) -> Result<(), SnapshotError> {
    let mut value = serde_json::to_value(state)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("v".to_string(), Value::from(SNAPSHOT_VERSION));
    }
    let tmp = path.as_ref().with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(&value)?)?;
    fs::rename(tmp, path)?;
    Ok(())
}

pub fn read(
    path: impl AsRef<Path>,
    registry: &MigrationRegistry,
) -> Result<Option<MaterializedState>, SnapshotError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let migrated = registry.migrate_to(value, SNAPSHOT_VERSION)?;
    Ok(Some(serde_json::from_value(migrated)?))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
