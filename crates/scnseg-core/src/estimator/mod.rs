//! Record-density estimation by sparse sampling.
//!
//! Counting every record in a range would cost a full scan, so the estimator counts a
//! handful of small, capped windows spread across the range and averages their
//! per-SCN densities. The result is noisy; everything downstream treats it as a hint.

mod cache;
mod sample;

pub use cache::DensityCache;
pub use sample::{plan_sample_windows, sample_point_count, SampleWindow};

use crate::config::SegmentationConfig;
use crate::error::SourceError;
use crate::source::{self, ConnectionFactory, LogConnection};

/// Anything that can estimate records per SCN unit over `[start, end)`.
///
/// Implementations never fail: errors are absorbed into a fallback density.
pub trait DensitySource {
    fn estimate_density(&self, start: u64, end: u64) -> f64;
}

impl<T> DensitySource for T
where
    T: Fn(u64, u64) -> f64,
{
    fn estimate_density(&self, start: u64, end: u64) -> f64 {
        self(start, end)
    }
}

/// Estimated record count for `[start, end)` at `density` (truncated, never negative).
pub fn estimated_records(density: f64, start: u64, end: u64) -> u64 {
    (density * end.saturating_sub(start) as f64) as u64
}

/// Sampling estimator over a live log source, memoized per exact range.
pub struct DensityEstimator<'a, F> {
    factory: &'a F,
    setup_sql: &'a str,
    config: &'a SegmentationConfig,
    cache: DensityCache,
}

impl<'a, F: ConnectionFactory> DensityEstimator<'a, F> {
    pub fn new(factory: &'a F, setup_sql: &'a str, config: &'a SegmentationConfig) -> Self {
        Self {
            factory,
            setup_sql,
            config,
            cache: DensityCache::new(),
        }
    }

    /// Number of distinct ranges estimated so far.
    pub fn cached_ranges(&self) -> usize {
        self.cache.len()
    }

    /// Counts every sample window on one connection and averages the non-empty ones.
    fn sample_density(&self, start: u64, end: u64) -> Result<f64, SourceError> {
        let windows = plan_sample_windows(start, end, self.config.sampling_ratio);
        let mut conn = source::open_initialized(self.factory, self.setup_sql)?;

        let mut density_sum = 0.0;
        let mut valid_samples = 0u32;
        for (i, window) in windows.iter().enumerate() {
            let count =
                conn.count_records(window.start, window.end, self.config.max_sampling_records)?;
            if count > 0 {
                let density = count as f64 / window.span() as f64;
                density_sum += density;
                valid_samples += 1;
            }
            tracing::trace!(
                sample = i + 1,
                start = window.start,
                end = window.end,
                count,
                "density sample"
            );
        }

        if valid_samples == 0 {
            return Ok(self.config.empty_sample_density);
        }
        Ok(density_sum / valid_samples as f64)
    }
}

impl<F: ConnectionFactory> DensitySource for DensityEstimator<'_, F> {
    fn estimate_density(&self, start: u64, end: u64) -> f64 {
        if let Some(density) = self.cache.get(start, end) {
            return density;
        }
        if end <= start {
            return self.config.empty_sample_density;
        }

        match self.sample_density(start, end) {
            Ok(density) => {
                let density = self.cache.insert(start, end, density);
                tracing::debug!("SCN[{}-{}] density estimate: {:.6} records/SCN", start, end, density);
                density
            }
            Err(e) => {
                tracing::error!(
                    "density estimation failed for SCN[{}-{}]: {}; using fallback {}",
                    start,
                    end,
                    e,
                    self.config.fallback_density
                );
                self.config.fallback_density
            }
        }
    }
}
