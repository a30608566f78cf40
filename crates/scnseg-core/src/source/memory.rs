//! In-process log source backed by an SCN-sorted record vector.
//!
//! Loadable from a JSON-lines file (one [`ChangeRecord`] per line), which is how the CLI
//! runs against exported change logs without a live database.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use super::{ChangeRecord, ConnectionFactory, LogConnection, LogSummary, RecordStream};
use crate::error::SourceError;

/// Shared, immutable record store. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSource {
    records: Arc<Vec<ChangeRecord>>,
}

impl MemoryLogSource {
    /// Builds a source from records in any order; they are sorted by SCN (stable).
    pub fn from_records(mut records: Vec<ChangeRecord>) -> Self {
        records.sort_by_key(|r| r.scn);
        Self {
            records: Arc::new(records),
        }
    }

    /// Parses JSON lines; blank lines are skipped.
    pub fn from_jsonl_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut records = Vec::new();
        for (lineno, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: ChangeRecord = serde_json::from_str(line)
                .map_err(|e| SourceError::Decode(format!("line {}: {}", lineno + 1, e)))?;
            records.push(record);
        }
        Ok(Self::from_records(records))
    }

    pub fn from_jsonl_path(path: &Path) -> Result<Self, SourceError> {
        let file = fs::File::open(path)?;
        let source = Self::from_jsonl_reader(file)?;
        tracing::debug!(
            path = %path.display(),
            records = source.len(),
            "loaded change log"
        );
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ConnectionFactory for MemoryLogSource {
    type Connection = MemoryConnection;

    fn connect(&self) -> Result<MemoryConnection, SourceError> {
        Ok(MemoryConnection {
            records: Arc::clone(&self.records),
            initialized: false,
        })
    }
}

/// Connection over a [`MemoryLogSource`]. Queries fail until the setup statement has run.
#[derive(Debug)]
pub struct MemoryConnection {
    records: Arc<Vec<ChangeRecord>>,
    initialized: bool,
}

impl MemoryConnection {
    fn ensure_initialized(&self) -> Result<(), SourceError> {
        if self.initialized {
            Ok(())
        } else {
            Err(SourceError::NotInitialized)
        }
    }

    fn slice(&self, start: u64, end: u64) -> &[ChangeRecord] {
        if end <= start {
            return &[];
        }
        let lo = self.records.partition_point(|r| r.scn < start);
        let hi = self.records.partition_point(|r| r.scn < end);
        &self.records[lo..hi]
    }
}

impl LogConnection for MemoryConnection {
    fn execute_setup(&mut self, _setup_sql: &str) -> Result<(), SourceError> {
        self.initialized = true;
        Ok(())
    }

    fn count_records(&mut self, start: u64, end: u64, max_rows: u64) -> Result<u64, SourceError> {
        self.ensure_initialized()?;
        Ok((self.slice(start, end).len() as u64).min(max_rows))
    }

    fn fetch_records(&mut self, start: u64, end: u64) -> Result<RecordStream<'_>, SourceError> {
        self.ensure_initialized()?;
        Ok(Box::new(self.slice(start, end).iter().cloned().map(Ok)))
    }

    fn summarize(&mut self) -> Result<LogSummary, SourceError> {
        self.ensure_initialized()?;
        let (Some(first), Some(last)) = (self.records.first(), self.records.last()) else {
            return Ok(LogSummary {
                min_scn: 0,
                max_scn: 0,
                total_records: 0,
            });
        };
        Ok(LogSummary {
            min_scn: first.scn,
            max_scn: last.scn,
            total_records: self.records.len() as u64,
        })
    }
}
