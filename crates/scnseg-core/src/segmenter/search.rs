//! Boundary binary search.

use crate::estimator::{estimated_records, DensitySource};

/// Finds an end SCN in `(start, max_end]` so that `[start, end)` holds roughly
/// `target` estimated records, accepting anything in `[target, upper]`.
///
/// Assumes the estimated count grows with the end boundary. Each probe re-samples its
/// own range, so nested estimates are not exactly consistent and the result can land
/// off target; the repair pass absorbs the worst of that. When no probe lands inside
/// the band, the closest overshoot (or `max_end`) is returned.
pub(super) fn find_segment_end<D: DensitySource + ?Sized>(
    density: &D,
    start: u64,
    max_end: u64,
    target: u64,
    upper: f64,
) -> u64 {
    if max_end <= start {
        return max_end;
    }
    let mut left = start + 1;
    let mut right = max_end;
    let mut best_end = max_end;

    while left <= right {
        let mid = left + (right - left) / 2;
        let estimate = estimated_records(density.estimate_density(start, mid), start, mid);

        if estimate < target {
            match mid.checked_add(1) {
                Some(next) => left = next,
                None => break,
            }
        } else if estimate as f64 > upper {
            best_end = mid;
            right = mid - 1;
        } else {
            best_end = mid;
            break;
        }
    }

    best_end.min(max_end)
}
