//! CLI command handlers, one per file.

mod analyze;
mod plan;
mod run;

pub use analyze::run_analyze;
pub use plan::run_plan;
pub use run::run_process;

use anyhow::{Context, Result};
use clap::Args;
use scnseg_core::analyze as log_analysis;
use scnseg_core::source::MemoryLogSource;
use std::path::PathBuf;

/// Source file and SCN bounds shared by `plan` and `run`.
#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// JSON-lines change log (one record per line).
    pub source: PathBuf,
    /// First SCN to include (default: lowest SCN in the log).
    #[arg(long)]
    pub start: Option<u64>,
    /// SCN to stop before (default: one past the highest SCN in the log).
    #[arg(long)]
    pub end: Option<u64>,
    /// Setup statement run on each connection before querying.
    #[arg(long, default_value = "")]
    pub setup: String,
}

impl RangeArgs {
    /// Loads the log and fills missing bounds from its summary.
    fn load(&self) -> Result<(MemoryLogSource, u64, u64)> {
        let log = MemoryLogSource::from_jsonl_path(&self.source)
            .with_context(|| format!("load change log {}", self.source.display()))?;
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                let summary = log_analysis::summarize(&log, &self.setup)?;
                (
                    start.unwrap_or(summary.min_scn),
                    end.unwrap_or(summary.max_scn.saturating_add(1)),
                )
            }
        };
        Ok((log, start, end))
    }
}
