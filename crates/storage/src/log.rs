// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only event log: one JSON row per line, monotonic sequence numbers.
//!
//! Writes are buffered and flushed once [`FLUSH_THRESHOLD`] rows accumulate
//! (or explicitly). Opening tolerates a corrupt tail: the valid prefix is
//! preserved, the damaged file is rotated to `.bak` (keeping at most three
//! backups), and appends continue from the last valid sequence number.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use room_core::{Event, Fields, Level};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Buffered rows before an automatic flush.
pub const FLUSH_THRESHOLD: usize = 100;

/// Backups kept when rotating a corrupt log file.
const MAX_BACKUPS: u32 = 3;

/// One durable row. Field names are the log's wire contract: the event name
/// lives in `event`, the monotonic sequence in `event_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub event_id: u64,
    pub ts: DateTime<Utc>,
    pub level: Level,
    pub event: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub fields: Fields,
    pub room_id: String,
}

impl LogRow {
    fn from_event(event_id: u64, event: &Event, room_id: &str) -> Self {
        Self {
            event_id,
            ts: event.ts,
            level: event.level,
            event: event.name.clone(),
            message: event.message.clone(),
            fields: event.fields.clone(),
            room_id: room_id.to_string(),
        }
    }
}

/// Errors from the event log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("event log encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

struct LogInner {
    writer: BufWriter<File>,
    next_seq: u64,
    buffered: usize,
}

/// Append-and-scan event log for one room.
pub struct EventLog {
    path: PathBuf,
    room_id: String,
    inner: Mutex<LogInner>,
}

impl EventLog {
    /// Open (or create) the log at `path`, recovering from a corrupt tail.
    pub fn open(path: &Path, room_id: &str) -> Result<Self, LogError> {
        let (rows, corrupt) = read_rows(path)?;
        if corrupt {
            tracing::warn!(
                path = %path.display(),
                valid_rows = rows.len(),
                "event log corrupt; rotating to .bak and keeping valid prefix"
            );
            rotate_backups(path)?;
            rewrite(path, &rows)?;
        }

        let next_seq = rows.last().map(|r| r.event_id + 1).unwrap_or(1);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            room_id: room_id.to_string(),
            inner: Mutex::new(LogInner {
                writer: BufWriter::new(file),
                next_seq,
                buffered: 0,
            }),
        })
    }

    /// Append one event, returning its sequence number.
    pub fn append(&self, event: &Event) -> Result<u64, LogError> {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        let row = LogRow::from_event(seq, event, &self.room_id);
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');
        inner.writer.write_all(&line)?;
        inner.next_seq += 1;
        inner.buffered += 1;
        if inner.buffered >= FLUSH_THRESHOLD {
            inner.writer.flush()?;
            inner.buffered = 0;
        }
        Ok(seq)
    }

    /// Flush buffered rows to the file.
    pub fn flush(&self) -> Result<(), LogError> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;
        inner.buffered = 0;
        Ok(())
    }

    /// The `limit` most recent rows, newest-first. Stops at a corrupt line.
    pub fn query(&self, limit: usize) -> Result<Vec<LogRow>, LogError> {
        self.flush()?;
        let (mut rows, _) = read_rows(&self.path)?;
        if rows.len() > limit {
            rows.drain(..rows.len() - limit);
        }
        rows.reverse();
        Ok(rows)
    }

    /// Sequence number of the most recently appended row (0 when empty).
    pub fn last_seq(&self) -> u64 {
        self.inner.lock().next_seq - 1
    }
}

/// Read the valid row prefix; the flag reports whether garbage followed it.
fn read_rows(path: &Path) -> Result<(Vec<LogRow>, bool), LogError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), false)),
        Err(e) => return Err(e.into()),
    };

    let mut rows = Vec::new();
    // A file not ending in a newline holds a partial write; a rewrite
    // repairs it even when the final fragment happens to parse.
    let mut corrupt = !bytes.is_empty() && !bytes.ends_with(b"\n");
    for line in bytes.split(|b| *b == b'\n') {
        if line.is_empty() {
            continue;
        }
        match serde_json::from_slice::<LogRow>(line) {
            Ok(row) => rows.push(row),
            Err(_) => {
                // Everything from here on is unreadable; keep the prefix.
                corrupt = true;
                break;
            }
        }
    }
    Ok((rows, corrupt))
}

/// Shift `.bak` → `.bak.2` → `.bak.3` (evicting the oldest), then copy the
/// current file into `.bak`.
fn rotate_backups(path: &Path) -> Result<(), LogError> {
    let backup = |n: u32| -> PathBuf {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };
    let _ = std::fs::remove_file(backup(MAX_BACKUPS));
    for n in (1..MAX_BACKUPS).rev() {
        let _ = std::fs::rename(backup(n), backup(n + 1));
    }
    std::fs::copy(path, backup(1))?;
    Ok(())
}

fn rewrite(path: &Path, rows: &[LogRow]) -> Result<(), LogError> {
    let mut out = Vec::new();
    for row in rows {
        out.extend(serde_json::to_vec(row)?);
        out.push(b'\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
