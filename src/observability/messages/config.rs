// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration file loaded and validated.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub source: &'a str,
    pub max_parallelism: i64,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration from '{}': max_parallelism={}",
            self.source, self.max_parallelism
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            source = self.source,
            max_parallelism = self.max_parallelism,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loaded",
            span_name = name,
            source = self.source,
            max_parallelism = self.max_parallelism,
        )
    }
}

/// Configuration file failed validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConfigRejected<'a> {
    pub source: &'a str,
    pub error_count: usize,
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration '{}' rejected with {} validation error(s)",
            self.source, self.error_count
        )
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::error!(
            source = self.source,
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            source = self.source,
            error_count = self.error_count,
        )
    }
}
