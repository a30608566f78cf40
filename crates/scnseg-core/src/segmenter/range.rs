//! SCN range type produced by the segmenter and filled in by the engine.

use std::fmt;
use std::time::Duration;

/// A segment: SCN range `[start, end)` (half-open) with its record estimate and,
/// once executed, its actual record count and elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScnRange {
    /// Start SCN (inclusive).
    pub start: u64,
    /// End SCN (exclusive).
    pub end: u64,
    pub estimated_records: u64,
    pub actual_records: Option<u64>,
    pub elapsed: Option<Duration>,
}

impl ScnRange {
    pub fn new(start: u64, end: u64, estimated_records: u64) -> Self {
        Self {
            start,
            end,
            estimated_records,
            actual_records: None,
            elapsed: None,
        }
    }

    /// Width of this range in SCN units.
    pub fn span(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// `start-end`, as used in statistics and reports.
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl fmt::Display for ScnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SCN[{}-{}] ~{} records",
            self.start, self.end, self.estimated_records
        )
    }
}
