//! Append-only record of user actions.
//!
//! The dashboard only ever writes here.  Writes are best-effort: a failing
//! log is reported through `tracing` and otherwise ignored, so it can never
//! affect gesture or session state.  Entries are buffered in memory during
//! the frame loop and reach disk on `flush`, which the loop calls at its
//! periodic status point and when it stops.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Header line of a fresh CSV activity log.
pub const CSV_HEADER: &str = "date|time|user|action";

/// Sink for activity events.
pub trait ActivityLog {
    /// Record one action.  Must not block the frame or fail.
    fn log(&mut self, user: &str, action: &str);

    /// Push buffered entries to their destination.  Called outside the
    /// per-frame path.
    fn flush(&mut self) {}
}

// ── CSV file ───────────────────────────────────────────────

/// `|`-delimited log file with local timestamps.
pub struct CsvActivityLog {
    path: PathBuf,
    file: Option<BufWriter<File>>,
}

impl CsvActivityLog {
    /// Create a log writing to `path`.  The file is opened on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Activity log: {}", path.display());
        Self { path, file: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<BufWriter<File>> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", CSV_HEADER)?;
        }
        Ok(BufWriter::new(file))
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        if self.file.is_none() {
            self.file = Some(self.open()?);
        }
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}

impl ActivityLog for CsvActivityLog {
    fn log(&mut self, user: &str, action: &str) {
        let line = format_entry(now_local(), user, action);
        if let Err(e) = self.write_line(&line) {
            warn!("Activity log write to {} failed: {}", self.path.display(), e);
            // Reopen on the next entry
            self.file = None;
        }
    }

    fn flush(&mut self) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = file.flush() {
            warn!("Activity log flush to {} failed: {}", self.path.display(), e);
            self.file = None;
        }
    }
}

fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Format one CSV line: `dd.mm.yyyy|HH:MM:SS|user|action`.
pub fn format_entry(at: OffsetDateTime, user: &str, action: &str) -> String {
    let date = at
        .format(format_description!("[day].[month].[year]"))
        .unwrap_or_default();
    let clock = at
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    format!(
        "{}|{}|{}|{}",
        date,
        clock,
        user.replace('|', "/"),
        action.replace('|', "/"),
    )
}

// ── In-memory ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub user: String,
    pub action: String,
}

/// Log that keeps entries in memory.  Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingActivityLog {
    entries: Arc<Mutex<Vec<ActivityEntry>>>,
}

impl RecordingActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.action).collect()
    }
}

impl ActivityLog for RecordingActivityLog {
    fn log(&mut self, user: &str, action: &str) {
        let entry = ActivityEntry {
            user: user.to_string(),
            action: action.to_string(),
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
