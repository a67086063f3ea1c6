// SPDX-License-Identifier: MIT

//! File-sentinel [`KillSwitch`] (spec.md §6.4): its presence at a known
//! path means "stop processing", checked cheaply by every Processor in
//! the fleet regardless of which process it runs in.

use qmon_core::KillSwitch;
use std::path::{Path, PathBuf};

pub const SENTINEL_FILE_NAME: &str = "KILL_SWITCH";

#[derive(Debug, Clone)]
pub struct FileKillSwitch {
    path: PathBuf,
}

impl FileKillSwitch {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self { path: data_dir.as_ref().join(SENTINEL_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KillSwitch for FileKillSwitch {
    fn is_active(&self) -> bool {
        self.path.exists()
    }

    fn activate(&self) {
        if let Err(err) = std::fs::write(&self.path, b"") {
            tracing::error!(path = %self.path.display(), error = %err, "failed to create kill switch sentinel");
        }
    }

    fn deactivate(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "failed to remove kill switch sentinel");
            }
        }
    }
}

#[cfg(test)]
#[path = "kill_switch_tests.rs"]
mod tests;
