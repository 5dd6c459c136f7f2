use crate::{EditAction, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// One committed edit, as recorded in a project's change log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: EditAction,
    pub component_id: String,
    pub user_request: String,
    pub details: String,
}

impl ChangeLogEntry {
    pub fn new(
        action: EditAction,
        component_id: impl Into<String>,
        user_request: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            component_id: component_id.into(),
            user_request: user_request.into(),
            details: details.into(),
        }
    }

    /// Render as a single log line. Embedded newlines are flattened.
    pub fn render_line(&self) -> String {
        format!(
            "[{}] {} {}: {} (request: \"{}\")",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.action,
            self.component_id,
            flatten(&self.details),
            flatten(&self.user_request),
        )
    }
}

fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Append-only destination for change log entries
pub trait ChangeLogSink {
    fn append(&mut self, entry: ChangeLogEntry) -> Result<()>;
}

/// Keeps entries in memory, mostly useful for callers that persist elsewhere
#[derive(Debug, Default)]
pub struct MemoryChangeLog {
    entries: Vec<ChangeLogEntry>,
}

impl MemoryChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChangeLogEntry] {
        &self.entries
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ChangeLogEntry::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChangeLogSink for MemoryChangeLog {
    fn append(&mut self, entry: ChangeLogEntry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }
}

/// Appends rendered lines to a text file, creating it on first write
#[derive(Debug, Clone)]
pub struct FileChangeLog {
    path: PathBuf,
}

impl FileChangeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChangeLogSink for FileChangeLog {
    fn append(&mut self, entry: ChangeLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.render_line())?;
        tracing::debug!("Appended change for {} to {:?}", entry.component_id, self.path);
        Ok(())
    }
}
