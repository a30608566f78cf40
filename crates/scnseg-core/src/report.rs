//! JSON run reports.
//!
//! A report wraps the run statistics with a timestamp, an overall status, and the
//! per-segment accuracy list, and is written as pretty-printed JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::RunStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every planned segment succeeded.
    Completed,
    /// At least one segment failed.
    Partial,
    /// The range produced no segments.
    Empty,
}

impl RunStatus {
    pub fn of(stats: &RunStatistics) -> Self {
        if stats.total_segments == 0 {
            RunStatus::Empty
        } else if stats.is_complete() {
            RunStatus::Completed
        } else {
            RunStatus::Partial
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Seconds since the Unix epoch when the report was built.
    pub generated_at: u64,
    pub status: RunStatus,
    pub performance: RunStatistics,
    pub segments_accuracy: Vec<f64>,
}

impl RunReport {
    pub fn new(stats: &RunStatistics) -> Self {
        let generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            generated_at,
            status: RunStatus::of(stats),
            performance: stats.clone(),
            segments_accuracy: stats.segment_details.iter().map(|d| d.accuracy).collect(),
        }
    }
}

/// Writes a report for `stats` to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, stats: &RunStatistics) -> Result<RunReport> {
    let report = RunReport::new(stats);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create report dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    tracing::info!("run report written to {}", path.display());
    Ok(report)
}

pub fn read_report(path: &Path) -> Result<RunReport> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read report {}", path.display()))?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SegmentDetail, SegmentFailure};

    fn stats() -> RunStatistics {
        RunStatistics {
            total_segments: 2,
            succeeded_segments: 1,
            failed_segments: 1,
            effective_workers: 2,
            total_records: 40,
            total_time_secs: 0.5,
            avg_time_per_segment_secs: 0.25,
            records_per_second: 80.0,
            segment_details: vec![SegmentDetail {
                range: "0-10".to_string(),
                start: 0,
                end: 10,
                estimated_records: 50,
                actual_records: 40,
                processing_time_secs: 0.2,
                accuracy: 0.25,
            }],
            failures: vec![SegmentFailure {
                range: "10-20".to_string(),
                start: 10,
                end: 20,
                estimated_records: 30,
                error: "boom".to_string(),
            }],
        }
    }

    #[test]
    fn report_written_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");
        let written = write_report(&path, &stats()).unwrap();
        assert_eq!(written.status, RunStatus::Partial);
        assert_eq!(written.segments_accuracy, vec![0.25]);

        let read = read_report(&path).unwrap();
        assert_eq!(read, written);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"status\": \"partial\""));
    }

    #[test]
    fn status_of_runs() {
        assert_eq!(RunStatus::of(&RunStatistics::default()), RunStatus::Empty);
        let mut s = stats();
        s.failed_segments = 0;
        s.failures.clear();
        s.succeeded_segments = 2;
        assert_eq!(RunStatus::of(&s), RunStatus::Completed);
    }
}
