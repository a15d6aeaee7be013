// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors raised when a configuration value is out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Max parallelism must be a positive integer
    NonPositiveParallelism {
        /// The rejected value
        value: i64,
    },
    /// Max parallelism exceeds the hard ceiling of the admission gate
    ParallelismOutOfRange {
        /// The rejected value
        value: i64,
        /// The largest accepted value
        maximum: usize,
    },
    /// A job name was supplied but is blank
    EmptyJobName,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveParallelism { value } => {
                write!(
                    f,
                    "Expected parallelism factor greater than zero, received {}",
                    value
                )
            }
            ValidationError::ParallelismOutOfRange { value, maximum } => {
                write!(
                    f,
                    "Parallelism factor {} exceeds the maximum of {}",
                    value, maximum
                )
            }
            ValidationError::EmptyJobName => {
                write!(f, "Pipeline option 'job_name' must not be blank")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
