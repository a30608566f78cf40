use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Parameters governing density sampling and segment boundary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Record count each segment aims for.
    pub target_records_per_segment: u64,
    /// Upper bound on the number of segments per run.
    pub max_segments: usize,
    /// Lower bound on the number of segments when the range is split at all.
    pub min_segments: usize,
    /// Fraction of a range's span covered by each sample window (e.g. 0.001 = 0.1%).
    pub sampling_ratio: f64,
    /// Row cap applied to every sample count query.
    pub max_sampling_records: u64,
    /// Fractional slack above the target accepted by the boundary search.
    pub tolerance_ratio: f64,
    /// Density returned when a sampling query or connection fails.
    pub fallback_density: f64,
    /// Density returned when every sample window came back empty.
    pub empty_sample_density: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            target_records_per_segment: 100_000,
            max_segments: 20,
            min_segments: 2,
            sampling_ratio: 0.001,
            max_sampling_records: 10_000,
            tolerance_ratio: 0.3,
            fallback_density: 0.01,
            empty_sample_density: 0.001,
        }
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange { name, value })
    }
}

fn check_density(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDensity { name, value })
    }
}

impl SegmentationConfig {
    /// Rejects configurations the segmenter cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_segments == 0 {
            return Err(ConfigError::MinSegmentsZero(self.min_segments));
        }
        if self.min_segments > self.max_segments {
            return Err(ConfigError::SegmentBounds {
                min: self.min_segments,
                max: self.max_segments,
            });
        }
        if self.target_records_per_segment == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        if self.max_sampling_records == 0 {
            return Err(ConfigError::ZeroSamplingCap);
        }
        check_ratio("sampling_ratio", self.sampling_ratio)?;
        check_ratio("tolerance_ratio", self.tolerance_ratio)?;
        check_density("fallback_density", self.fallback_density)?;
        check_density("empty_sample_density", self.empty_sample_density)?;
        Ok(())
    }

    /// Upper edge of the accepted band: `target * (1 + tolerance)`.
    pub fn upper_tolerance(&self, target: u64) -> f64 {
        target as f64 * (1.0 + self.tolerance_ratio)
    }
}

/// Worker pool and batching limits for segment execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker cap used when the caller does not request a worker count.
    pub default_max_workers: usize,
    /// Records handed to the callback per invocation.
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_max_workers: 8,
            batch_size: 1000,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_max_workers == 0 {
            return Err(ConfigError::ZeroEngineLimit("default_max_workers"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroEngineLimit("batch_size"));
        }
        Ok(())
    }
}

/// Global configuration loaded from `~/.config/scnseg/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScnsegConfig {
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ScnsegConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.segmentation.validate()?;
        self.engine.validate()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("scnseg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScnsegConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ScnsegConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<ScnsegConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: ScnsegConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
