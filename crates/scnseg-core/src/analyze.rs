//! Whole-log analysis used to size a run before planning it.

use crate::config::SegmentationConfig;
use crate::error::SourceError;
use crate::segmenter::recommend_segment_count;
use crate::source::{self, ConnectionFactory, LogConnection, LogSummary};

/// Log summary plus the segment count suggested for its exact size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogAnalysis {
    pub summary: LogSummary,
    pub recommended_segments: usize,
}

/// Queries min/max SCN and total record count over the whole log.
pub fn summarize<F: ConnectionFactory>(
    factory: &F,
    setup_sql: &str,
) -> Result<LogSummary, SourceError> {
    let mut conn = source::open_initialized(factory, setup_sql)?;
    let summary = conn.summarize()?;
    tracing::info!(
        "log spans SCN[{}-{}]: {} records, {:.4} records/SCN",
        summary.min_scn,
        summary.max_scn,
        summary.total_records,
        summary.density()
    );
    Ok(summary)
}

pub fn analyze<F: ConnectionFactory>(
    factory: &F,
    setup_sql: &str,
    config: &SegmentationConfig,
) -> Result<LogAnalysis, SourceError> {
    let summary = summarize(factory, setup_sql)?;
    Ok(LogAnalysis {
        summary,
        recommended_segments: recommend_segment_count(summary.total_records, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChangeRecord, MemoryLogSource, Operation};

    #[test]
    fn analyze_memory_log() {
        let records = (0..2_500u64)
            .map(|i| ChangeRecord {
                scn: 1_000 + i * 4,
                timestamp: 0,
                operation: Operation::Commit,
                table_name: String::new(),
                sql_redo: None,
                sql_undo: None,
            })
            .collect();
        let source = MemoryLogSource::from_records(records);
        let cfg = SegmentationConfig {
            target_records_per_segment: 1_000,
            ..SegmentationConfig::default()
        };
        let analysis = analyze(&source, "", &cfg).unwrap();
        assert_eq!(analysis.summary.min_scn, 1_000);
        assert_eq!(analysis.summary.max_scn, 1_000 + 2_499 * 4);
        assert_eq!(analysis.summary.total_records, 2_500);
        assert_eq!(analysis.recommended_segments, 2);
    }
}
