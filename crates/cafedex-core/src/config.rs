//! Layered pipeline configuration: defaults -> TOML file -> CAFEDEX_*
//! environment variables. Later layers win. Provider API keys are read
//! from the environment only and never serialized.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CafedexError, Result};
use crate::filters::BoundingBox;

/// Configuration source for tracking where values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority).
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence.
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding every stage checkpoint.
    pub data_dir: ConfigValue<PathBuf>,
    /// Geographic bounding box for the seed filter.
    pub bounds: ConfigValue<BoundingBox>,
    /// Structured-generation model identifier.
    pub generation_model: ConfigValue<String>,
    /// Embedding model identifier.
    pub embedding_model: ConfigValue<String>,
    /// Texts per embedding provider call.
    pub embedding_batch_size: ConfigValue<usize>,
    /// Retry attempts after the first failure.
    pub max_retries: ConfigValue<u32>,
    /// Base backoff delay in milliseconds (doubles per attempt).
    pub retry_base_delay_ms: ConfigValue<u64>,
}

impl PipelineConfig {
    /// Create a new configuration with default values.
    pub fn with_defaults() -> Self {
        Self {
            data_dir: ConfigValue::new(PathBuf::from("data/prebuild"), ConfigSource::Default),
            bounds: ConfigValue::new(BoundingBox::TAIPEI, ConfigSource::Default),
            generation_model: ConfigValue::new(
                "claude-sonnet-4-5".to_string(),
                ConfigSource::Default,
            ),
            embedding_model: ConfigValue::new(
                "text-embedding-3-small".to_string(),
                ConfigSource::Default,
            ),
            embedding_batch_size: ConfigValue::new(64, ConfigSource::Default),
            max_retries: ConfigValue::new(3, ConfigSource::Default),
            retry_base_delay_ms: ConfigValue::new(1000, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| CafedexError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| CafedexError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }
        if let Some(bounds) = file_config.bounds {
            self.bounds.update(bounds, ConfigSource::File);
        }
        if let Some(model) = file_config.generation_model {
            self.generation_model.update(model, ConfigSource::File);
        }
        if let Some(model) = file_config.embedding_model {
            self.embedding_model.update(model, ConfigSource::File);
        }
        if let Some(batch) = file_config.embedding_batch_size {
            self.embedding_batch_size.update(batch, ConfigSource::File);
        }
        if let Some(retries) = file_config.max_retries {
            self.max_retries.update(retries, ConfigSource::File);
        }
        if let Some(delay) = file_config.retry_base_delay_ms {
            self.retry_base_delay_ms.update(delay, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables.
    pub fn load_from_env(mut self) -> Self {
        if let Ok(dir) = env::var("CAFEDEX_DATA_DIR") {
            self.data_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(model) = env::var("CAFEDEX_GENERATION_MODEL") {
            self.generation_model.update(model, ConfigSource::Environment);
        }
        if let Ok(model) = env::var("CAFEDEX_EMBEDDING_MODEL") {
            self.embedding_model.update(model, ConfigSource::Environment);
        }
        if let Ok(batch_str) = env::var("CAFEDEX_EMBEDDING_BATCH_SIZE") {
            match batch_str.parse::<usize>() {
                Ok(batch) if batch > 0 => {
                    self.embedding_batch_size.update(batch, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid CAFEDEX_EMBEDDING_BATCH_SIZE value '{}': expected positive integer",
                    batch_str
                ),
            }
        }
        if let Ok(retries_str) = env::var("CAFEDEX_MAX_RETRIES") {
            match retries_str.parse::<u32>() {
                Ok(retries) => self.max_retries.update(retries, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CAFEDEX_MAX_RETRIES value '{}': expected integer",
                    retries_str
                ),
            }
        }
        if let Ok(delay_str) = env::var("CAFEDEX_RETRY_BASE_DELAY_MS") {
            match delay_str.parse::<u64>() {
                Ok(delay) => self.retry_base_delay_ms.update(delay, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CAFEDEX_RETRY_BASE_DELAY_MS value '{}': expected integer",
                    delay_str
                ),
            }
        }

        self
    }

    /// Standard load order: defaults, then the optional config file,
    /// then the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::with_defaults();
        if let Some(path) = config_file {
            config = config.load_from_file(path)?;
        }
        Ok(config.load_from_env())
    }

    /// Checkpoint path inside the configured data directory.
    pub fn checkpoint_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.value.join(file_name)
    }
}

/// Shape of the optional TOML config file.
#[derive(Debug, Deserialize)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    bounds: Option<BoundingBox>,
    generation_model: Option<String>,
    embedding_model: Option<String>,
    embedding_batch_size: Option<usize>,
    max_retries: Option<u32>,
    retry_base_delay_ms: Option<u64>,
}
