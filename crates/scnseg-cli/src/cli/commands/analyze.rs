//! `scnseg analyze <source>` – log bounds and sizing hint.

use anyhow::{Context, Result};
use scnseg_core::analyze;
use scnseg_core::config::ScnsegConfig;
use scnseg_core::source::MemoryLogSource;
use std::path::PathBuf;

pub async fn run_analyze(cfg: &ScnsegConfig, source: PathBuf, setup: String) -> Result<()> {
    let segmentation = cfg.segmentation.clone();
    let analysis = tokio::task::spawn_blocking(move || -> Result<_> {
        let log = MemoryLogSource::from_jsonl_path(&source)
            .with_context(|| format!("load change log {}", source.display()))?;
        Ok(analyze::analyze(&log, &setup, &segmentation)?)
    })
    .await
    .context("analyze task join")??;

    let s = analysis.summary;
    println!("SCN range:      {} - {}", s.min_scn, s.max_scn);
    println!("Total records:  {}", s.total_records);
    println!("SCN span:       {}", s.span());
    println!("Avg density:    {:.4} records/SCN", s.density());
    println!("Recommended:    {} segment(s)", analysis.recommended_segments);
    Ok(())
}
