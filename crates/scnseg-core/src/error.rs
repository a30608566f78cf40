//! Error types shared across the crate.
//!
//! Only [`ConfigError`] ever escapes a processing run. [`SourceError`] is absorbed by the
//! density estimator and [`SegmentError`] is recorded per segment in the run statistics.

use thiserror::Error;

/// Failure reported by a log-source collaborator (connection, setup, count or fetch).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("connect: {0}")]
    Connect(String),
    #[error("setup statement failed: {0}")]
    Setup(String),
    /// Count or fetch query failed.
    #[error("query SCN[{start}-{end}]: {message}")]
    Query { start: u64, end: u64, message: String },
    #[error("decode record: {0}")]
    Decode(String),
    /// Count/fetch issued on a connection whose setup statement has not run.
    #[error("connection not initialized: run the setup statement first")]
    NotInitialized,
    #[error("{0} is not supported by this log source")]
    Unsupported(&'static str),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid configuration or run arguments. Raised before any query is issued.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("min_segments must be at least 1 (got {0})")]
    MinSegmentsZero(usize),
    #[error("min_segments ({min}) exceeds max_segments ({max})")]
    SegmentBounds { min: usize, max: usize },
    #[error("target_records_per_segment must be positive")]
    ZeroTarget,
    #[error("max_sampling_records must be positive")]
    ZeroSamplingCap,
    #[error("{name} must be in (0, 1] (got {value})")]
    RatioOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be a positive finite density (got {value})")]
    InvalidDensity { name: &'static str, value: f64 },
    #[error("{0} must be at least 1")]
    ZeroEngineLimit(&'static str),
    #[error("invalid SCN range: start {start} is after end {end}")]
    InvalidRange { start: u64, end: u64 },
    #[error("max_workers must be at least 1")]
    ZeroWorkers,
}

/// Why a single segment's fetch-and-process cycle failed.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("log source: {0}")]
    Source(#[from] SourceError),
    #[error("record callback failed: {0:#}")]
    Callback(anyhow::Error),
    #[error("segment worker panicked: {0}")]
    Panicked(String),
}
