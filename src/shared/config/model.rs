use serde::Deserialize;

use crate::engine::core::segment::EncodingType;
use crate::engine::core::vector::VectorCompressionType;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Rows per chunk for tables created without an explicit size.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub default_encoding: EncodingType,
    #[serde(default)]
    pub vector_compression: VectorCompressionType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            default_encoding: EncodingType::default(),
            vector_compression: VectorCompressionType::default(),
        }
    }
}

fn default_chunk_size() -> usize {
    65_535
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Chunk count from which scans and validation fan out over rayon.
    #[serde(default = "default_parallel_chunk_threshold")]
    pub parallel_chunk_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel_chunk_threshold: default_parallel_chunk_threshold(),
        }
    }
}

fn default_parallel_chunk_threshold() -> usize {
    4
}

use std::env;

/// Reads the file named by `STRATA_CONFIG` (default `config`, any format the
/// `config` crate knows) if it exists, then `STRATA__SECTION__KEY`
/// environment overrides.
pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("STRATA_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("STRATA").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
