//! Run statistics: totals, throughput, and per-segment estimate accuracy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::segmenter::ScnRange;

/// Relative estimate error: `|estimated - actual| / max(actual, 1)`.
pub fn accuracy(estimated: u64, actual: u64) -> f64 {
    estimated.abs_diff(actual) as f64 / actual.max(1) as f64
}

/// Outcome of one successfully processed segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDetail {
    /// `start-end`.
    pub range: String,
    pub start: u64,
    pub end: u64,
    pub estimated_records: u64,
    pub actual_records: u64,
    pub processing_time_secs: f64,
    pub accuracy: f64,
}

/// A segment whose fetch, setup, or callback failed. Not retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFailure {
    pub range: String,
    pub start: u64,
    pub end: u64,
    pub estimated_records: u64,
    pub error: String,
}

/// Aggregate result of one processing run.
///
/// `total_segments` is the planned count; failed segments are listed in `failures` and
/// excluded from `total_records` and `segment_details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_segments: usize,
    pub succeeded_segments: usize,
    pub failed_segments: usize,
    pub effective_workers: usize,
    pub total_records: u64,
    pub total_time_secs: f64,
    pub avg_time_per_segment_secs: f64,
    pub records_per_second: f64,
    pub segment_details: Vec<SegmentDetail>,
    pub failures: Vec<SegmentFailure>,
}

impl RunStatistics {
    /// Zero-work outcome for a range that produced no segments.
    pub fn empty(total_time: Duration) -> Self {
        Self {
            total_time_secs: total_time.as_secs_f64(),
            ..Self::default()
        }
    }

    /// Builds statistics from executed segments (those with `actual_records` set count as
    /// succeeded, in plan order) and the failures collected by the worker pool.
    pub fn aggregate(
        segments: &[ScnRange],
        failures: Vec<SegmentFailure>,
        total_time: Duration,
        effective_workers: usize,
    ) -> Self {
        let segment_details: Vec<SegmentDetail> = segments
            .iter()
            .filter_map(|s| {
                let actual = s.actual_records?;
                Some(SegmentDetail {
                    range: s.range_label(),
                    start: s.start,
                    end: s.end,
                    estimated_records: s.estimated_records,
                    actual_records: actual,
                    processing_time_secs: s.elapsed.unwrap_or_default().as_secs_f64(),
                    accuracy: accuracy(s.estimated_records, actual),
                })
            })
            .collect();

        let total_records = segment_details.iter().map(|d| d.actual_records).sum();
        let total_time_secs = total_time.as_secs_f64();
        let total_segments = segments.len();

        let avg_time_per_segment_secs = if total_segments > 0 {
            total_time_secs / total_segments as f64
        } else {
            0.0
        };
        let records_per_second = if total_time_secs > 0.0 {
            total_records as f64 / total_time_secs
        } else {
            0.0
        };

        Self {
            total_segments,
            succeeded_segments: segment_details.len(),
            failed_segments: failures.len(),
            effective_workers,
            total_records,
            total_time_secs,
            avg_time_per_segment_secs,
            records_per_second,
            segment_details,
            failures,
        }
    }

    /// True when every planned segment succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed_segments == 0 && self.succeeded_segments == self.total_segments
    }

    /// Mean of per-segment accuracy values (0 when nothing succeeded).
    pub fn mean_accuracy(&self) -> f64 {
        if self.segment_details.is_empty() {
            return 0.0;
        }
        self.segment_details.iter().map(|d| d.accuracy).sum::<f64>()
            / self.segment_details.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executed(start: u64, end: u64, est: u64, actual: u64, millis: u64) -> ScnRange {
        let mut r = ScnRange::new(start, end, est);
        r.actual_records = Some(actual);
        r.elapsed = Some(Duration::from_millis(millis));
        r
    }

    #[test]
    fn accuracy_handles_zero_actual() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(5, 0), 5.0);
        assert!((accuracy(90, 100) - 0.1).abs() < 1e-12);
        assert!((accuracy(110, 100) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn aggregate_excludes_failed_segments() {
        let segments = vec![
            executed(0, 10, 100, 80, 500),
            ScnRange::new(10, 20, 100),
            executed(20, 30, 100, 120, 500),
        ];
        let failures = vec![SegmentFailure {
            range: "10-20".to_string(),
            start: 10,
            end: 20,
            estimated_records: 100,
            error: "query failed".to_string(),
        }];
        let stats = RunStatistics::aggregate(&segments, failures, Duration::from_secs(2), 3);
        assert_eq!(stats.total_segments, 3);
        assert_eq!(stats.succeeded_segments, 2);
        assert_eq!(stats.failed_segments, 1);
        assert_eq!(stats.total_records, 200);
        assert!((stats.records_per_second - 100.0).abs() < 1e-9);
        assert!((stats.avg_time_per_segment_secs - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.segment_details.len(), 2);
        assert_eq!(stats.segment_details[0].range, "0-10");
        assert!((stats.segment_details[0].accuracy - 0.25).abs() < 1e-12);
        assert!(!stats.is_complete());
    }

    #[test]
    fn empty_run_is_zeroed() {
        let stats = RunStatistics::empty(Duration::ZERO);
        assert_eq!(stats.total_segments, 0);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.records_per_second, 0.0);
        assert_eq!(stats.mean_accuracy(), 0.0);
        assert!(stats.is_complete());
    }
}
