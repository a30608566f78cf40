//! Single-segment fetch and batched callback delivery.

use crate::error::SegmentError;
use crate::segmenter::ScnRange;
use crate::source::{self, ChangeRecord, ConnectionFactory, LogConnection};

/// Opens a connection, fetches `[segment.start, segment.end)` in SCN order and hands the
/// records to `callback` in batches of `batch_size`, flushing the final partial batch.
/// Returns the number of records delivered.
pub(super) fn process_one_segment<F, C>(
    factory: &F,
    setup_sql: &str,
    segment: &ScnRange,
    batch_size: usize,
    callback: &C,
) -> Result<u64, SegmentError>
where
    F: ConnectionFactory,
    C: Fn(&[ChangeRecord]) -> anyhow::Result<()>,
{
    let mut conn = source::open_initialized(factory, setup_sql)?;
    let records = conn.fetch_records(segment.start, segment.end)?;

    let mut batch: Vec<ChangeRecord> = Vec::with_capacity(batch_size);
    let mut record_count = 0u64;
    for record in records {
        batch.push(record?);
        record_count += 1;
        if batch.len() >= batch_size {
            callback(&batch).map_err(SegmentError::Callback)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        callback(&batch).map_err(SegmentError::Callback)?;
    }

    tracing::debug!("{}: delivered {} record(s)", segment, record_count);
    Ok(record_count)
}
