//! Adaptive segmentation of an SCN range.
//!
//! Splits `[start, end)` into contiguous segments of roughly equal estimated record
//! count: decide the segment count from a whole-range estimate, binary-search each
//! boundary against the target, then merge segments that came out too small.

mod range;
mod repair;
mod search;

pub use range::ScnRange;
pub use repair::{merge_undersized, MIN_SEGMENT_FRACTION};

use crate::config::SegmentationConfig;
use crate::estimator::{estimated_records, DensitySource};

/// Segment count for a non-degenerate range: `ceil(total / target)` clamped to
/// `[min_segments, max_segments]`.
pub fn ideal_segment_count(total_estimated: u64, config: &SegmentationConfig) -> usize {
    let target = config.target_records_per_segment.max(1);
    let wanted = total_estimated.div_ceil(target);
    let wanted = usize::try_from(wanted).unwrap_or(usize::MAX);
    wanted.clamp(config.min_segments, config.max_segments)
}

/// Sizing helper for a log whose exact record count is already known: 1 when it fits a
/// single segment, otherwise `total / target` clamped to the configured bounds.
pub fn recommend_segment_count(total_records: u64, config: &SegmentationConfig) -> usize {
    let target = config.target_records_per_segment.max(1);
    if total_records <= target {
        return 1;
    }
    let wanted = usize::try_from(total_records / target).unwrap_or(usize::MAX);
    wanted.clamp(config.min_segments, config.max_segments)
}

/// Plans segments over a [`DensitySource`].
pub struct AdaptiveSegmenter<'a, D: ?Sized> {
    density: &'a D,
    config: &'a SegmentationConfig,
}

impl<'a, D: DensitySource + ?Sized> AdaptiveSegmenter<'a, D> {
    pub fn new(density: &'a D, config: &'a SegmentationConfig) -> Self {
        Self { density, config }
    }

    /// Ordered, gap-free segments covering `[start, end)` exactly.
    /// Empty when `end <= start`.
    pub fn create_segments(&self, start: u64, end: u64) -> Vec<ScnRange> {
        if end <= start {
            return Vec::new();
        }
        tracing::info!("segmenting SCN range [{}-{}]", start, end);

        let density = self.density.estimate_density(start, end);
        let total_estimated = estimated_records(density, start, end);
        tracing::info!("estimated total records: {}", total_estimated);

        let target = self.config.target_records_per_segment;
        if total_estimated <= target {
            tracing::info!("range fits one segment");
            return vec![ScnRange::new(start, end, total_estimated)];
        }

        let ideal = ideal_segment_count(total_estimated, self.config);
        tracing::info!("ideal segment count: {}", ideal);

        let segments = self.search_boundaries(start, end, ideal);
        let segments = merge_undersized(segments, target);

        tracing::info!("planned {} segment(s)", segments.len());
        for (i, segment) in segments.iter().enumerate() {
            tracing::debug!("  segment {}: {}", i + 1, segment);
        }
        segments
    }

    /// Public entry to the boundary search, using the configured target band.
    pub fn find_segment_end(&self, start: u64, max_end: u64, target: u64) -> u64 {
        search::find_segment_end(
            self.density,
            start,
            max_end,
            target,
            self.config.upper_tolerance(target),
        )
    }

    fn search_boundaries(&self, start: u64, end: u64, segment_count: usize) -> Vec<ScnRange> {
        let target = self.config.target_records_per_segment;
        let mut segments = Vec::with_capacity(segment_count);
        let mut current = start;

        for idx in 0..segment_count {
            let segment_end = if idx + 1 == segment_count {
                end
            } else {
                self.find_segment_end(current, end, target)
            };
            if segment_end <= current {
                tracing::warn!("boundary search stalled at SCN {}", current);
                break;
            }

            let density = self.density.estimate_density(current, segment_end);
            let estimate = estimated_records(density, current, segment_end);
            segments.push(ScnRange::new(current, segment_end, estimate));
            current = segment_end;

            if current >= end {
                break;
            }
        }

        if current < end {
            let density = self.density.estimate_density(current, end);
            segments.push(ScnRange::new(current, end, estimated_records(density, current, end)));
        }
        segments
    }
}
