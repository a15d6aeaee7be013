// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for bundle lifecycle and dispatch events.
//!
//! This module contains message types for logging events related to:
//! * Bundle lifecycle (start, drain, failure)
//! * Element dispatch and admission control
//! * Worker failures, including failures dropped after the first

use crate::errors::CancelPoint;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Bundle started with the given processor and admission capacity.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use bundle_parallel::observability::messages::engine::BundleStarted;
///
/// let msg = BundleStarted {
///     processor: "enrich",
///     max_parallelism: 16,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BundleStarted<'a> {
    pub processor: &'a str,
    pub max_parallelism: usize,
}

impl Display for BundleStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting bundle for processor '{}' with max_parallelism={}",
            self.processor, self.max_parallelism
        )
    }
}

impl StructuredLog for BundleStarted<'_> {
    fn log(&self) {
        tracing::info!(
            processor = self.processor,
            max_parallelism = self.max_parallelism,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "bundle",
            span_name = name,
            processor = self.processor,
            max_parallelism = self.max_parallelism,
        )
    }
}

/// Element handed to the execution backend.
///
/// # Log Level
/// `debug!` - High-volume diagnostic event
pub struct WorkItemDispatched {
    pub item: u64,
    pub outstanding: usize,
}

impl Display for WorkItemDispatched {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatched item {} ({} tickets outstanding)",
            self.item, self.outstanding
        )
    }
}

impl StructuredLog for WorkItemDispatched {
    fn log(&self) {
        tracing::debug!(
            item = self.item,
            outstanding = self.outstanding,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "work_item",
            span_name = name,
            item = self.item,
        )
    }
}

/// A worker failed and its error became the bundle's terminal failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkItemFailed<'a> {
    pub processor: &'a str,
    pub item: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkItemFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' failed on item {}: {}",
            self.processor, self.item, self.error
        )
    }
}

impl StructuredLog for WorkItemFailed<'_> {
    fn log(&self) {
        tracing::error!(
            processor = self.processor,
            item = self.item,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "work_item_failed",
            span_name = name,
            processor = self.processor,
            item = self.item,
        )
    }
}

/// A worker failed after another failure had already been captured; this error
/// is discarded.
///
/// # Log Level
/// `warn!` - Unexpected but handled
pub struct InterleavedFailureDropped<'a> {
    pub processor: &'a str,
    pub item: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for InterleavedFailureDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropping failure of processor '{}' on item {} (bundle already failed): {}",
            self.processor, self.item, self.error
        )
    }
}

impl StructuredLog for InterleavedFailureDropped<'_> {
    fn log(&self) {
        tracing::warn!(
            processor = self.processor,
            item = self.item,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "interleaved_failure",
            span_name = name,
            processor = self.processor,
            item = self.item,
        )
    }
}

/// The producer was cancelled while waiting on the admission gate.
///
/// # Log Level
/// `warn!` - Unexpected but handled
pub struct AdmissionCancelled {
    pub point: CancelPoint,
    pub outstanding: usize,
}

impl Display for AdmissionCancelled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bundle cancelled while {} ({} tickets outstanding)",
            self.point, self.outstanding
        )
    }
}

impl StructuredLog for AdmissionCancelled {
    fn log(&self) {
        tracing::warn!(
            point = %self.point,
            outstanding = self.outstanding,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "admission_cancelled",
            span_name = name,
            point = %self.point,
        )
    }
}

/// All dispatched elements completed and the bundle finished cleanly.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BundleDrained<'a> {
    pub processor: &'a str,
    pub items: u64,
    pub duration: std::time::Duration,
}

impl Display for BundleDrained<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bundle for processor '{}' finished: {} items in {:?}",
            self.processor, self.items, self.duration
        )
    }
}

impl StructuredLog for BundleDrained<'_> {
    fn log(&self) {
        tracing::info!(
            processor = self.processor,
            items = self.items,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "bundle_drained",
            span_name = name,
            processor = self.processor,
            items = self.items,
            duration = ?self.duration,
        )
    }
}

/// The bundle finished with a captured failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct BundleFailed<'a> {
    pub processor: &'a str,
    pub failed_item: u64,
    pub items: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for BundleFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bundle for processor '{}' failed after dispatching {} items (first failure on item {}): {}",
            self.processor, self.items, self.failed_item, self.error
        )
    }
}

impl StructuredLog for BundleFailed<'_> {
    fn log(&self) {
        tracing::error!(
            processor = self.processor,
            failed_item = self.failed_item,
            items = self.items,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "bundle_failed",
            span_name = name,
            processor = self.processor,
            failed_item = self.failed_item,
        )
    }
}

/// A task run by an execution backend resolved with a failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerTaskFailed<'a> {
    pub backend: &'a str,
    pub item: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkerTaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker task for item {} failed on {} backend: {}",
            self.item, self.backend, self.error
        )
    }
}

impl StructuredLog for WorkerTaskFailed<'_> {
    fn log(&self) {
        tracing::error!(
            backend = self.backend,
            item = self.item,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "worker_task_failed",
            span_name = name,
            backend = self.backend,
            item = self.item,
        )
    }
}
