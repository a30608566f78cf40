//! CLI for the scnseg change-log segmenter.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use scnseg_core::config;
use std::path::PathBuf;

use commands::{run_analyze, run_plan, run_process, RangeArgs};

/// Top-level CLI for scnseg.
#[derive(Debug, Parser)]
#[command(name = "scnseg")]
#[command(about = "scnseg: density-sampled segmentation and parallel processing of change logs", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/scnseg/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the segment plan for an SCN range without processing it.
    Plan {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Segment an SCN range and process it in parallel.
    Run {
        #[command(flatten)]
        range: RangeArgs,
        /// Maximum concurrent segment workers (default: config `default_max_workers`).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Write a JSON run report to this path.
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },

    /// Summarize a change log: SCN bounds, record count, recommended segments.
    Analyze {
        /// JSON-lines change log (one record per line).
        source: PathBuf,
        /// Setup statement run on each connection before querying.
        #[arg(long, default_value = "")]
        setup: String,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            clap_complete::generate(shell, &mut Cli::command(), "scnseg", &mut std::io::stdout());
            return Ok(());
        }

        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Plan { range } => run_plan(&cfg, range).await?,
            CliCommand::Run {
                range,
                workers,
                report,
            } => run_process(&cfg, range, workers, report).await?,
            CliCommand::Analyze { source, setup } => run_analyze(&cfg, source, setup).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
