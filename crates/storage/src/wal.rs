// SPDX-License-Identifier: MIT

//! Append-only write-ahead log of [`Event`]s, replayed into
//! [`crate::state::MaterializedState`] on startup.

use fs2::FileExt;
use qmon_core::Event;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum WalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt WAL entry: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("WAL is already locked by another process: {0}")]
    Locked(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    seq: u64,
    event: Event,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalEntry {
    pub seq: u64,
    pub event: Event,
}

/// Single-writer-per-process append-only log. One agent's rows partition
/// disjointly from another's by the `(id, agent)` composite key, so a
/// single `Wal` per process (guarded by this struct's own file lock) is
/// sufficient — spec.md §4.1 "Concurrency".
pub struct Wal {
    path: PathBuf,
    file: File,
    entries: Vec<Record>,
    write_seq: u64,
    processed_seq: u64,
    read_cursor: u64,
}

impl Wal {
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
        file.try_lock_exclusive().map_err(|_| WalError::Locked(path.clone()))?;

        let mut entries = Vec::new();
        let mut write_seq = 0;
        for line in BufReader::new(File::open(&path)?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(&line)?;
            write_seq = write_seq.max(record.seq);
            entries.push(record);
        }

        Ok(Self { path, file, entries, write_seq, processed_seq, read_cursor: processed_seq })
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        self.write_seq += 1;
        let record = Record { seq: self.write_seq, event: event.clone() };
        let line = serde_json::to_string(&record)?;
        writeln!(self.file, "{line}")?;
        self.entries.push(record);
        Ok(self.write_seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.file.flush()?;
        Ok(())
    }

    /// Return the next entry past both `processed_seq` (as of open) and
    /// every entry already handed out by a prior call, or `None` if caught
    /// up to `write_seq`.
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, WalError> {
        if self.read_cursor >= self.write_seq {
            return Ok(None);
        }
        let next_seq = self.read_cursor + 1;
        let record = self
            .entries
            .iter()
            .find(|r| r.seq == next_seq)
            .cloned()
            .expect("WAL entries must be contiguous from 1..=write_seq");
        self.read_cursor = next_seq;
        Ok(Some(WalEntry { seq: record.seq, event: record.event }))
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    pub fn entries_after(&self, seq: u64) -> Result<Vec<WalEntry>, WalError> {
        Ok(self
            .entries
            .iter()
            .filter(|r| r.seq > seq)
            .map(|r| WalEntry { seq: r.seq, event: r.event.clone() })
            .collect())
    }

    /// Compact the log, dropping entries with `seq < keep_from` (used after
    /// a snapshot makes them redundant for replay).
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<(), WalError> {
        self.entries.retain(|r| r.seq >= keep_from);
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        for record in &self.entries {
            let line = serde_json::to_string(record)?;
            writeln!(self.file, "{line}")?;
        }
        self.file.flush()?;
        Ok(())
    }
}

impl Drop for Wal {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = &self.path; // kept for diagnostics via Debug derive on error paths
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
