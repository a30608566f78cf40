//! Segment execution engine.
//!
//! Plans segments for `[start, end)` with a fresh density estimator, dispatches every
//! segment to a bounded worker pool (each worker opens its own connection and streams
//! the segment's records to the callback in batches), then aggregates statistics.
//! Segment failures are logged and reported in the statistics; they never abort the run.

mod run;
mod segment;
mod stats;

pub use stats::{accuracy, RunStatistics, SegmentDetail, SegmentFailure};

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::{EngineConfig, SegmentationConfig};
use crate::error::ConfigError;
use crate::estimator::DensityEstimator;
use crate::segmenter::{AdaptiveSegmenter, ScnRange};
use crate::source::{ChangeRecord, ConnectionFactory};

/// Worker count for a run: the requested count (or `default_cap`) bounded by the
/// number of segments, and at least one.
pub fn effective_workers(requested: Option<usize>, segment_count: usize, default_cap: usize) -> usize {
    requested
        .unwrap_or(default_cap)
        .min(segment_count)
        .max(1)
}

/// Entry point: segments an SCN range and processes it in parallel.
pub struct SegmentProcessor<F> {
    factory: F,
    setup_sql: String,
    config: SegmentationConfig,
    engine: EngineConfig,
    last_stats: Mutex<RunStatistics>,
}

impl<F: ConnectionFactory> SegmentProcessor<F> {
    /// Validates `config` (default when `None`) before anything touches the log source.
    pub fn new(
        factory: F,
        setup_sql: impl Into<String>,
        config: Option<SegmentationConfig>,
    ) -> Result<Self, ConfigError> {
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(Self {
            factory,
            setup_sql: setup_sql.into(),
            config,
            engine: EngineConfig::default(),
            last_stats: Mutex::new(RunStatistics::default()),
        })
    }

    pub fn with_engine_config(mut self, engine: EngineConfig) -> Result<Self, ConfigError> {
        engine.validate()?;
        self.engine = engine;
        Ok(self)
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    fn lock_stats(&self) -> MutexGuard<'_, RunStatistics> {
        self.last_stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Statistics of the most recent run (default-valued before the first run).
    pub fn last_stats(&self) -> RunStatistics {
        self.lock_stats().clone()
    }

    /// Segment plan for `[start, end)` without executing it.
    pub fn plan(&self, start: u64, end: u64) -> Result<Vec<ScnRange>, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        let estimator = DensityEstimator::new(&self.factory, &self.setup_sql, &self.config);
        Ok(AdaptiveSegmenter::new(&estimator, &self.config).create_segments(start, end))
    }

    /// Plans and processes `[start, end)`, invoking `callback` with batches of records.
    ///
    /// `callback` runs concurrently from several workers when more than one is used;
    /// records within a segment arrive in ascending SCN order, with no ordering across
    /// segments. Only invalid arguments return `Err`; segment failures are recorded in
    /// the returned statistics.
    pub fn process_range<C>(
        &self,
        start: u64,
        end: u64,
        callback: &C,
        max_workers: Option<usize>,
    ) -> Result<RunStatistics, ConfigError>
    where
        C: Fn(&[ChangeRecord]) -> anyhow::Result<()> + Sync,
    {
        if max_workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        let started = Instant::now();
        let segments = self.plan(start, end)?;
        Ok(self.execute(segments, callback, max_workers, started))
    }

    /// Processes an already planned list of segments.
    pub fn execute_segments<C>(
        &self,
        segments: Vec<ScnRange>,
        callback: &C,
        max_workers: Option<usize>,
    ) -> Result<RunStatistics, ConfigError>
    where
        C: Fn(&[ChangeRecord]) -> anyhow::Result<()> + Sync,
    {
        if max_workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(self.execute(segments, callback, max_workers, Instant::now()))
    }

    fn execute<C>(
        &self,
        mut segments: Vec<ScnRange>,
        callback: &C,
        max_workers: Option<usize>,
        started: Instant,
    ) -> RunStatistics
    where
        C: Fn(&[ChangeRecord]) -> anyhow::Result<()> + Sync,
    {
        segments.retain(|s| !s.is_empty());
        if segments.is_empty() {
            tracing::warn!("no segments produced; nothing to process");
            let stats = RunStatistics::empty(started.elapsed());
            *self.lock_stats() = stats.clone();
            return stats;
        }

        let workers = effective_workers(
            max_workers,
            segments.len(),
            self.engine.default_max_workers,
        );
        tracing::info!(
            "processing {} segment(s) with {} worker(s)",
            segments.len(),
            workers
        );

        let results = run::run_bounded(
            &self.factory,
            &self.setup_sql,
            &segments,
            workers,
            self.engine.batch_size,
            callback,
        );

        let mut failures = Vec::new();
        for (index, res) in results {
            let seg = &mut segments[index];
            match res {
                Ok(outcome) => {
                    seg.actual_records = Some(outcome.records);
                    seg.elapsed = Some(outcome.elapsed);
                }
                Err(e) => failures.push(SegmentFailure {
                    range: seg.range_label(),
                    start: seg.start,
                    end: seg.end,
                    estimated_records: seg.estimated_records,
                    error: e.to_string(),
                }),
            }
        }
        failures.sort_by_key(|f| f.start);

        let total_time: Duration = started.elapsed();
        let stats = RunStatistics::aggregate(&segments, failures, total_time, workers);
        if stats.failed_segments > 0 {
            tracing::warn!(
                "{} of {} segment(s) failed and were excluded from totals",
                stats.failed_segments,
                stats.total_segments
            );
        }
        tracing::info!(
            "run complete: {} records in {:.2}s ({:.1} records/s)",
            stats.total_records,
            stats.total_time_secs,
            stats.records_per_second
        );

        *self.lock_stats() = stats.clone();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_workers_bounds() {
        assert_eq!(effective_workers(Some(4), 10, 8), 4);
        assert_eq!(effective_workers(Some(16), 3, 8), 3);
        assert_eq!(effective_workers(None, 20, 8), 8);
        assert_eq!(effective_workers(None, 2, 8), 2);
        assert_eq!(effective_workers(None, 0, 8), 1);
    }
}
