//! Tracing setup for scnseg runs.
//!
//! Runs can be long and are usually unattended, so events go to an append-only file
//! under the XDG state dir. `RUST_LOG` overrides [`DEFAULT_DIRECTIVES`].

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Debug for the engine and segmenter. Estimator detail needs an explicit `RUST_LOG`.
pub const DEFAULT_DIRECTIVES: &str =
    "info,scnseg=debug,scnseg_core::engine=debug,scnseg_core::segmenter=debug";

/// Per-event handle on the shared log file. Falls back to stderr when the handle
/// cannot be duplicated.
enum EventSink {
    File(fs::File),
    Stderr,
}

impl Write for EventSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            EventSink::File(f) => f.write(buf),
            EventSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            EventSink::File(f) => f.flush(),
            EventSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct RunLog(fs::File);

impl<'a> MakeWriter<'a> for RunLog {
    type Writer = EventSink;

    fn make_writer(&'a self) -> EventSink {
        match self.0.try_clone() {
            Ok(f) => EventSink::File(f),
            Err(_) => EventSink::Stderr,
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// `$XDG_STATE_HOME/scnseg/scnseg.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("scnseg").context("resolve XDG dirs")?;
    Ok(dirs.get_state_home().join("scnseg").join("scnseg.log"))
}

/// Installs the global subscriber writing to [`log_file_path`]. Errors leave no
/// subscriber installed; callers fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(BoxMakeWriter::new(RunLog(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))?;

    tracing::info!("logging to {}", path.display());
    Ok(())
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
