// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::MAX_PARALLELISM;
use crate::config::Config;
use crate::errors::ValidationError;

/// Check a requested parallelism factor and convert it to a ticket count.
///
/// Accepts `1..=MAX_PARALLELISM`; anything else is an invalid configuration.
pub fn validate_max_parallelism(requested: i64) -> Result<usize, ValidationError> {
    if requested <= 0 {
        return Err(ValidationError::NonPositiveParallelism { value: requested });
    }
    let value = usize::try_from(requested).map_err(|_| ValidationError::ParallelismOutOfRange {
        value: requested,
        maximum: MAX_PARALLELISM,
    })?;
    if value > MAX_PARALLELISM {
        return Err(ValidationError::ParallelismOutOfRange {
            value: requested,
            maximum: MAX_PARALLELISM,
        });
    }
    Ok(value)
}

/// Validate every section of a loaded configuration.
///
/// Collects all problems rather than stopping at the first one.
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(requested) = cfg.parallelism.max_parallelism {
        if let Err(e) = validate_max_parallelism(requested) {
            errors.push(e);
        }
    }

    if let Err(e) = cfg.pipeline_options.validate() {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
