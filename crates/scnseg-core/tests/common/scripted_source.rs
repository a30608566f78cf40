//! Log source for integration tests: in-memory records plus injected failures and
//! connection accounting.
//!
//! Wraps a `MemoryLogSource`; fetches overlapping a poisoned SCN fail, counts can be
//! made to fail wholesale, and the factory tracks how many connections were open at once.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scnseg_core::error::SourceError;
use scnseg_core::source::{
    ChangeRecord, ConnectionFactory, LogConnection, MemoryConnection, MemoryLogSource, Operation,
    RecordStream,
};

#[derive(Debug, Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub count_queries: AtomicUsize,
    pub fetch_queries: AtomicUsize,
}

#[derive(Clone)]
pub struct ScriptedSource {
    inner: MemoryLogSource,
    poisoned_scn: Option<u64>,
    fail_counts: Arc<AtomicBool>,
    fetch_delay: Duration,
    pub counters: Arc<Counters>,
}

/// `count` records, one every `every` SCNs starting at `first`, cycling through tables.
pub fn uniform_records(first: u64, count: u64, every: u64) -> Vec<ChangeRecord> {
    let tables = ["ORDERS", "ACCOUNTS", "AUDIT_LOG"];
    (0..count)
        .map(|i| {
            let scn = first + i * every;
            ChangeRecord {
                scn,
                timestamp: 1_700_000_000_000 + i as i64,
                operation: match i % 3 {
                    0 => Operation::Insert,
                    1 => Operation::Update,
                    _ => Operation::Delete,
                },
                table_name: tables[(i % 3) as usize].to_string(),
                sql_redo: Some(format!("redo {scn}")),
                sql_undo: Some(format!("undo {scn}")),
            }
        })
        .collect()
}

impl ScriptedSource {
    pub fn new(records: Vec<ChangeRecord>) -> Self {
        Self {
            inner: MemoryLogSource::from_records(records),
            poisoned_scn: None,
            fail_counts: Arc::new(AtomicBool::new(false)),
            fetch_delay: Duration::ZERO,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Fetches whose range contains `scn` fail.
    pub fn poison_fetch_at(mut self, scn: u64) -> Self {
        self.poisoned_scn = Some(scn);
        self
    }

    /// Every count query fails.
    pub fn failing_counts(self) -> Self {
        self.fail_counts.store(true, Ordering::SeqCst);
        self
    }

    /// Holds each fetch open for `delay` so workers overlap.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }
}

pub struct ScriptedConnection {
    inner: MemoryConnection,
    source: ScriptedSource,
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.source.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConnectionFactory for ScriptedSource {
    type Connection = ScriptedConnection;

    fn connect(&self) -> Result<ScriptedConnection, SourceError> {
        let c = &self.counters;
        c.opened.fetch_add(1, Ordering::SeqCst);
        let now = c.active.fetch_add(1, Ordering::SeqCst) + 1;
        c.max_active.fetch_max(now, Ordering::SeqCst);
        Ok(ScriptedConnection {
            inner: self.inner.connect()?,
            source: self.clone(),
        })
    }
}

impl LogConnection for ScriptedConnection {
    fn execute_setup(&mut self, setup_sql: &str) -> Result<(), SourceError> {
        self.inner.execute_setup(setup_sql)
    }

    fn count_records(&mut self, start: u64, end: u64, max_rows: u64) -> Result<u64, SourceError> {
        self.source.counters.count_queries.fetch_add(1, Ordering::SeqCst);
        if self.source.fail_counts.load(Ordering::SeqCst) {
            return Err(SourceError::Query {
                start,
                end,
                message: "ORA-01291: missing logfile".to_string(),
            });
        }
        self.inner.count_records(start, end, max_rows)
    }

    fn fetch_records(&mut self, start: u64, end: u64) -> Result<RecordStream<'_>, SourceError> {
        self.source.counters.fetch_queries.fetch_add(1, Ordering::SeqCst);
        if !self.source.fetch_delay.is_zero() {
            thread::sleep(self.source.fetch_delay);
        }
        if let Some(scn) = self.source.poisoned_scn {
            if (start..end).contains(&scn) {
                return Err(SourceError::Query {
                    start,
                    end,
                    message: "ORA-00310: archived log contains sequence error".to_string(),
                });
            }
        }
        self.inner.fetch_records(start, end)
    }
}
