//! Merge pass for undersized segments.

use super::range::ScnRange;

/// Segments estimated below this fraction of the target are merged into their successor.
pub const MIN_SEGMENT_FRACTION: f64 = 0.1;

/// Single left-to-right sweep: a segment estimated below 10% of `target` is merged with
/// the segment right after it (union interval, saturating sum of estimates) and the sweep skips past
/// both. Merges never cascade, and a trailing undersized segment is left alone.
pub fn merge_undersized(segments: Vec<ScnRange>, target: u64) -> Vec<ScnRange> {
    let threshold = target as f64 * MIN_SEGMENT_FRACTION;
    let mut out = Vec::with_capacity(segments.len());
    let mut iter = segments.into_iter().peekable();

    while let Some(current) = iter.next() {
        if (current.estimated_records as f64) < threshold {
            if let Some(next) = iter.next() {
                let merged = ScnRange::new(
                    current.start,
                    next.end,
                    current.estimated_records.saturating_add(next.estimated_records),
                );
                tracing::info!("merged undersized segment: {} + {} -> {}", current, next, merged);
                out.push(merged);
                continue;
            }
        }
        out.push(current);
    }
    out
}
