// SPDX-License-Identifier: MIT

//! Forward-compatible snapshot schema migrations, so an older on-disk
//! snapshot can still be loaded by a newer build of the engine.

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("snapshot version {found} is newer than the highest known version {target}")]
    TooNew { found: u32, target: u32 },
    #[error("no migration path from version {from} to {to}")]
    NoPath { from: u32, to: u32 },
}

/// One step in a version chain: `from -> from + 1`.
pub trait Migration: Send + Sync {
    fn from_version(&self) -> u32;
    fn to_version(&self) -> u32;
    fn migrate(&self, snapshot: Value) -> Value;
}

#[derive(Default)]
pub struct MigrationRegistry {
    migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, migration: Box<dyn Migration>) {
        self.migrations.push(migration);
    }

    /// Apply the chain of registered migrations to bring `snapshot` (whose
    /// `"v"` field names its version) up to `target`. A snapshot already at
    /// `target` passes through unchanged.
    pub fn migrate_to(&self, mut snapshot: Value, target: u32) -> Result<Value, MigrationError> {
        let mut version = snapshot
            .get("v")
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .unwrap_or(0);

        if version > target {
            return Err(MigrationError::TooNew { found: version, target });
        }

        while version < target {
            let step = self
                .migrations
                .iter()
                .find(|m| m.from_version() == version)
                .ok_or(MigrationError::NoPath { from: version, to: target })?;
            snapshot = step.migrate(snapshot);
            if let Some(obj) = snapshot.as_object_mut() {
                obj.insert("v".to_string(), Value::from(step.to_version()));
            }
            version = step.to_version();
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
