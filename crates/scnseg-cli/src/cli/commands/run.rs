//! `scnseg run` – segment and process a range in parallel.

use anyhow::{Context, Result};
use scnseg_core::config::ScnsegConfig;
use scnseg_core::engine::{RunStatistics, SegmentProcessor};
use scnseg_core::report;
use scnseg_core::source::{ChangeRecord, Operation};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::RangeArgs;

fn print_stats(stats: &RunStatistics, tally: &HashMap<Operation, u64>) {
    println!(
        "  {:>4}  {:>21}  {:>10}  {:>10}  {:>8}  {:>8}",
        "Seg", "Range", "Estimated", "Actual", "Err(%)", "Time(s)"
    );
    println!(
        "  {}  {}  {}  {}  {}  {}",
        "----", "---------------------", "----------", "----------", "--------", "--------"
    );
    for (i, d) in stats.segment_details.iter().enumerate() {
        println!(
            "  {:>4}  {:>21}  {:>10}  {:>10}  {:>8.1}  {:>8.2}",
            i + 1,
            d.range,
            d.estimated_records,
            d.actual_records,
            d.accuracy * 100.0,
            d.processing_time_secs
        );
    }
    for f in &stats.failures {
        println!("  FAILED {}: {}", f.range, f.error);
    }
    println!();
    println!(
        "Segments: {} planned, {} succeeded, {} failed ({} workers)",
        stats.total_segments, stats.succeeded_segments, stats.failed_segments, stats.effective_workers
    );
    println!(
        "Records:  {} in {:.2}s ({:.1} records/s)",
        stats.total_records, stats.total_time_secs, stats.records_per_second
    );
    let mut ops: Vec<_> = tally.iter().collect();
    ops.sort_by_key(|(op, _)| format!("{:?}", op));
    for (op, n) in ops {
        println!("  {:<12} {}", format!("{:?}", op).to_uppercase(), n);
    }
}

pub async fn run_process(
    cfg: &ScnsegConfig,
    range: RangeArgs,
    workers: Option<usize>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let cfg = cfg.clone();
    let (stats, tally) = tokio::task::spawn_blocking(move || -> Result<_> {
        let (log, start, end) = range.load()?;
        let processor = SegmentProcessor::new(log, range.setup, Some(cfg.segmentation))?
            .with_engine_config(cfg.engine)?;

        let tally: Mutex<HashMap<Operation, u64>> = Mutex::new(HashMap::new());
        let callback = |batch: &[ChangeRecord]| -> Result<()> {
            let mut t = tally
                .lock()
                .map_err(|_| anyhow::anyhow!("operation tally poisoned"))?;
            for record in batch {
                *t.entry(record.operation).or_default() += 1;
            }
            Ok(())
        };
        let stats = processor.process_range(start, end, &callback, workers)?;
        let tally = tally
            .into_inner()
            .map_err(|_| anyhow::anyhow!("operation tally poisoned"))?;
        Ok((stats, tally))
    })
    .await
    .context("run task join")??;

    print_stats(&stats, &tally);

    if let Some(path) = report_path {
        report::write_report(&path, &stats)?;
        println!("Report written to {}", path.display());
    }

    if stats.failed_segments > 0 {
        anyhow::bail!(
            "{} of {} segment(s) failed",
            stats.failed_segments,
            stats.total_segments
        );
    }
    Ok(())
}
