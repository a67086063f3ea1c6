// SPDX-License-Identifier: MIT

//! Orphan reaping: finding engine processes that belong to no currently
//! tracked [`crate::supervisor::record::ProcessTable`] entry, left behind by
//! a previous supervisor instance that crashed before it could record or
//! clean up its children (spec.md §4.6 "orphan reaping", §9).

use crate::supervisor::process::RUN_ENGINE_SUBCOMMAND;
use std::fs;

/// One live `__run-engine` process discovered by scanning `/proc`,
/// independent of anything the process table knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEngineProcess {
    pub pid: u32,
    pub agent_id: String,
}

/// Scan `/proc/<pid>/cmdline` for every numeric entry, returning the ones
/// that look like an engine child (by command-line pattern, per spec.md
/// §4.6's `list()` note — this process has no other reliable handle once
/// its parent supervisor is gone).
pub fn scan_engine_processes() -> Vec<ObservedEngineProcess> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir("/proc") else { return found };

    for entry in entries.flatten() {
        let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        let Ok(raw) = fs::read(entry.path().join("cmdline")) else { continue };
        let args: Vec<&str> = raw
            .split(|&b| b == 0)
            .filter(|s| !s.is_empty())
            .map(|s| std::str::from_utf8(s).unwrap_or(""))
            .collect();

        if !args.iter().any(|a| *a == RUN_ENGINE_SUBCOMMAND) {
            continue;
        }
        let Some(agent_id) = args
            .iter()
            .position(|a| *a == "--agent-id")
            .and_then(|i| args.get(i + 1))
            .map(|s| s.to_string())
        else {
            continue;
        };

        found.push(ObservedEngineProcess { pid, agent_id });
    }

    found
}

/// From a live scan and the set of pids the process table already tracks,
/// return the ones that are genuinely unowned.
pub fn orphans_among(
    observed: Vec<ObservedEngineProcess>,
    tracked_pids: &[u32],
) -> Vec<ObservedEngineProcess> {
    observed.into_iter().filter(|p| !tracked_pids.contains(&p.pid)).collect()
}

#[cfg(test)]
#[path = "orphan_tests.rs"]
mod tests;
