use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub dates: DateSerialConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the original uploaded workbook binaries.
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Rows per insert batch. Batch boundaries carry no meaning beyond
    /// bounding per-request memory and statement size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

fn default_result_limit() -> i64 {
    100
}

/// Bounds of the numeric window inside which a bare number is reinterpreted
/// as a spreadsheet date serial. Empirical constants (roughly years
/// 1954-2064); both comparisons are exclusive.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DateSerialConfig {
    #[serde(default = "default_serial_min")]
    pub serial_min: f64,
    #[serde(default = "default_serial_max")]
    pub serial_max: f64,
}

impl Default for DateSerialConfig {
    fn default() -> Self {
        Self {
            serial_min: default_serial_min(),
            serial_max: default_serial_max(),
        }
    }
}

fn default_serial_min() -> f64 {
    20000.0
}

fn default_serial_max() -> f64 {
    60000.0
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.ingest.batch_size == 0 {
        anyhow::bail!("ingest.batch_size must be > 0");
    }

    if config.search.result_limit < 1 {
        anyhow::bail!("search.result_limit must be >= 1");
    }

    if config.dates.serial_min >= config.dates.serial_max {
        anyhow::bail!("dates.serial_min must be < dates.serial_max");
    }

    Ok(config)
}
