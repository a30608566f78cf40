//! `scnseg plan` – print the segment plan.

use anyhow::{Context, Result};
use scnseg_core::config::ScnsegConfig;
use scnseg_core::engine::SegmentProcessor;

use super::RangeArgs;

pub async fn run_plan(cfg: &ScnsegConfig, range: RangeArgs) -> Result<()> {
    let segmentation = cfg.segmentation.clone();
    let segments = tokio::task::spawn_blocking(move || -> Result<_> {
        let (log, start, end) = range.load()?;
        let processor = SegmentProcessor::new(log, range.setup, Some(segmentation))?;
        Ok(processor.plan(start, end)?)
    })
    .await
    .context("plan task join")??;

    if segments.is_empty() {
        println!("Empty range: no segments.");
        return Ok(());
    }
    println!("{:>4}  {:>12}  {:>12}  {:>12}", "#", "START", "END", "ESTIMATED");
    for (i, s) in segments.iter().enumerate() {
        println!(
            "{:>4}  {:>12}  {:>12}  {:>12}",
            i + 1,
            s.start,
            s.end,
            s.estimated_records
        );
    }
    let total: u64 = segments.iter().map(|s| s.estimated_records).sum();
    println!("{} segment(s), ~{} records", segments.len(), total);
    Ok(())
}
