// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::ValidationError;

/// Pipeline-wide configuration visible to every processor through its context.
///
/// # Example
/// ```yaml
/// pipeline_options:
///   job_name: enrich-orders
///   values:
///     endpoint: https://pricing.internal
///     timeout_ms: 250
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PipelineOptions {
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub values: HashMap<String, serde_yaml::Value>,
}

impl PipelineOptions {
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = Some(job_name.into());
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn job_name(&self) -> Option<&str> {
        self.job_name.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.as_u64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.job_name {
            Some(name) if name.trim().is_empty() => Err(ValidationError::EmptyJobName),
            _ => Ok(()),
        }
    }
}
