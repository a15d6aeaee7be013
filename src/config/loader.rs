// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_MAX_PARALLELISM;
use crate::config::PipelineOptions;
use crate::errors::ConfigError;
use crate::observability::messages::config::{ConfigLoaded, ConfigRejected};
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure for the bundle-parallel engine.
///
/// Loaded from YAML (or TOML when the file ends in `.toml`). Every section is
/// optional; an empty document yields the defaults.
///
/// # Fields
/// * `parallelism` - Admission gate sizing (optional)
/// * `pipeline_options` - Options exposed to processors through their context (optional)
///
/// # Example
/// ```yaml
/// parallelism:
///   max_parallelism: 10
/// pipeline_options:
///   job_name: enrich-orders
///   values:
///     endpoint: https://pricing.internal
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parallelism: ParallelismConfig,
    #[serde(default)]
    pub pipeline_options: PipelineOptions,
}

/// Admission gate configuration.
///
/// `max_parallelism` is kept signed so that zero and negative values reach
/// validation and are reported instead of failing to parse.
#[derive(Debug, Default, Deserialize)]
pub struct ParallelismConfig {
    pub max_parallelism: Option<i64>,
}

impl ParallelismConfig {
    /// Get the configured parallelism, using the built-in default if not configured.
    pub fn get_max_parallelism(&self) -> i64 {
        self.max_parallelism
            .unwrap_or(DEFAULT_MAX_PARALLELISM as i64)
    }
}

/// Parse a config document. TOML is chosen for `.toml` paths, YAML otherwise.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let cfg = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(cfg)
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load a config from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Load and validate a config file
///
/// Every validation problem is reported together in `ConfigError::Invalid`.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let cfg = load_config(path)?;
    let source = path.display().to_string();

    if let Err(validation_errors) = crate::config::validate_config(&cfg) {
        ConfigRejected {
            source: &source,
            error_count: validation_errors.len(),
        }
        .log();
        return Err(ConfigError::Invalid(validation_errors));
    }

    ConfigLoaded {
        source: &source,
        max_parallelism: cfg.parallelism.get_max_parallelism(),
    }
    .log();

    Ok(cfg)
}
