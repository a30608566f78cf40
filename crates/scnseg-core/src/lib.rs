pub mod config;
pub mod error;
pub mod logging;

pub mod analyze;
pub mod engine;
pub mod estimator;
pub mod report;
pub mod segmenter;
pub mod source;
