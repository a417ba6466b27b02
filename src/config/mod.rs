use crate::error::{FilterError, Result};
use crate::filters::moving_average::DEFAULT_WINDOW;
use crate::filters::spec::{FilterMode, DEFAULT_SAMPLE_RATE};
use crate::filters::FilterAlgorithm;
use crate::processing::stream_filter::{FilterOptions, NonFinitePolicy};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub recording: RecordingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProcessorConfig {
    pub sample_rate: f64,
    pub channels: usize,
    pub mode: FilterMode,
    pub algorithm: FilterAlgorithm,
    pub window: usize,
    pub non_finite: NonFinitePolicy,
    pub enable_debug_logging: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 6,
            mode: FilterMode::None,
            algorithm: FilterAlgorithm::default(),
            window: DEFAULT_WINDOW,
            non_finite: NonFinitePolicy::default(),
            enable_debug_logging: false,
        }
    }
}

impl ProcessorConfig {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            sample_rate: self.sample_rate,
            algorithm: self.algorithm,
            window: self.window,
            non_finite: self.non_finite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RecordingConfig {
    pub directory: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("recordings"),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let processor = &self.processor;
        if !processor.sample_rate.is_finite() || processor.sample_rate <= 0.0 {
            return Err(FilterError::Config(format!(
                "sample_rate must be positive, got {}",
                processor.sample_rate
            )));
        }
        if processor.channels == 0 {
            return Err(FilterError::Config("channels must be at least 1".to_string()));
        }
        if processor.window == 0 {
            return Err(FilterError::Config("window must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;
    Ok(())
}
