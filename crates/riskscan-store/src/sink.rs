//! Record sinks
//!
//! Each append opens the file, writes, flushes, and closes it again, so a
//! crash between subjects never leaves a half-written row behind.

use crate::record::{ResultRecord, RECORD_FIELDS};
use riskscan_core::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::debug;

/// Append-only destination for result records
pub trait RecordSink: Send {
    /// Durably append one record
    fn append(&mut self, record: &ResultRecord) -> Result<()>;

    /// Human-readable destination, reported at the end of a run
    fn destination(&self) -> String;
}

/// CSV file sink with a single header row
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A header is due when the file is missing or has no bytes yet
    fn needs_header(&self) -> Result<bool> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, record: &ResultRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let write_header = self.needs_header()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        if write_header {
            writer.write_record(RECORD_FIELDS)?;
        }
        writer.write_record(record.to_row())?;
        writer.flush()?;

        debug!(path = %self.path.display(), title = %record.title, "record appended");
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory sink
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<ResultRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &ResultRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn destination(&self) -> String {
        "memory".to_string()
    }
}
