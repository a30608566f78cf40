//! Log-source collaborator contracts.
//!
//! The core never speaks a wire protocol itself: it opens connections through a
//! [`ConnectionFactory`], runs the opaque setup statement once per connection, then
//! issues capped count queries (sampling) or ordered fetch queries (execution).

mod memory;

pub use memory::{MemoryConnection, MemoryLogSource};

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Kind of change captured by a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Insert,
    Update,
    Delete,
    Ddl,
    Start,
    Commit,
    Rollback,
    #[serde(other)]
    Unsupported,
}

/// One change-log record as delivered to the processing callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub scn: u64,
    /// Commit timestamp in Unix epoch milliseconds.
    pub timestamp: i64,
    pub operation: Operation,
    pub table_name: String,
    /// Forward (redo) change payload.
    #[serde(default)]
    pub sql_redo: Option<String>,
    /// Backward (undo) change payload.
    #[serde(default)]
    pub sql_undo: Option<String>,
}

/// Whole-log bounds and size, for sizing a run before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub min_scn: u64,
    pub max_scn: u64,
    pub total_records: u64,
}

impl LogSummary {
    pub fn span(&self) -> u64 {
        self.max_scn.saturating_sub(self.min_scn)
    }

    /// Average records per SCN unit over the whole log (0 for a zero-width log).
    pub fn density(&self) -> f64 {
        match self.span() {
            0 => 0.0,
            span => self.total_records as f64 / span as f64,
        }
    }
}

/// Ordered stream of records returned by a fetch query.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<ChangeRecord, SourceError>> + 'a>;

/// An open connection to the log store.
pub trait LogConnection {
    /// Runs the opaque initialization statement. Must precede any count or fetch.
    fn execute_setup(&mut self, setup_sql: &str) -> Result<(), SourceError>;

    /// Counts records with `start <= scn < end`, stopping at `max_rows`.
    fn count_records(&mut self, start: u64, end: u64, max_rows: u64) -> Result<u64, SourceError>;

    /// Streams records with `start <= scn < end` in ascending SCN order.
    fn fetch_records(&mut self, start: u64, end: u64) -> Result<RecordStream<'_>, SourceError>;

    /// Min/max SCN and total record count of the whole log.
    fn summarize(&mut self) -> Result<LogSummary, SourceError> {
        Err(SourceError::Unsupported("log summary"))
    }
}

/// Produces fresh, independent connections. Called concurrently from workers.
pub trait ConnectionFactory: Send + Sync {
    type Connection: LogConnection;

    fn connect(&self) -> Result<Self::Connection, SourceError>;
}

/// Opens a connection and runs the setup statement on it.
pub(crate) fn open_initialized<F: ConnectionFactory>(
    factory: &F,
    setup_sql: &str,
) -> Result<F::Connection, SourceError> {
    let mut conn = factory.connect()?;
    conn.execute_setup(setup_sql)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_decodes_known_and_unknown_kinds() {
        let op: Operation = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(op, Operation::Delete);
        let op: Operation = serde_json::from_str("\"SELECT_LOB_LOCATOR\"").unwrap();
        assert_eq!(op, Operation::Unsupported);
    }

    #[test]
    fn summary_density() {
        let s = LogSummary {
            min_scn: 1000,
            max_scn: 3000,
            total_records: 500,
        };
        assert_eq!(s.span(), 2000);
        assert!((s.density() - 0.25).abs() < 1e-12);
        let empty = LogSummary {
            min_scn: 7,
            max_scn: 7,
            total_records: 1,
        };
        assert_eq!(empty.density(), 0.0);
    }
}
