//! Sample window planning.

/// Fewest sample windows taken for any range.
pub const MIN_SAMPLE_POINTS: u64 = 2;
/// Most sample windows taken for any range.
pub const MAX_SAMPLE_POINTS: u64 = 5;
/// SCN span that earns one additional sample window, up to the cap.
pub const SPAN_PER_SAMPLE_POINT: u64 = 1000;

/// A half-open SCN window `[start, end)` to count records in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub start: u64,
    pub end: u64,
}

impl SampleWindow {
    pub fn span(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// Number of windows for a span: one per 1000 SCNs, clamped to 2..=5.
pub fn sample_point_count(total_span: u64) -> u64 {
    (total_span / SPAN_PER_SAMPLE_POINT).clamp(MIN_SAMPLE_POINTS, MAX_SAMPLE_POINTS)
}

/// Splits `[start, end)` into equal strides and places one window of
/// `max(1, span * sampling_ratio)` SCNs at the head of each stride, clipped to `end`.
/// Degenerate windows (`end <= start`) are dropped.
pub fn plan_sample_windows(start: u64, end: u64, sampling_ratio: f64) -> Vec<SampleWindow> {
    let total_span = end.saturating_sub(start);
    if total_span == 0 {
        return Vec::new();
    }
    let sample_span = ((total_span as f64 * sampling_ratio) as u64).max(1);
    let points = sample_point_count(total_span);
    let stride = total_span / points;

    (0..points)
        .filter_map(|i| {
            let sample_start = start + i * stride;
            let sample_end = sample_start.saturating_add(sample_span).min(end);
            (sample_end > sample_start).then_some(SampleWindow {
                start: sample_start,
                end: sample_end,
            })
        })
        .collect()
}
