// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types surfaced by the dispatch engine.
//!
//! A bundle fails as a whole. The first error escaping any worker is captured once and
//! every later re-raise hands back that same captured value, so callers can downcast
//! to the error type their processor produced.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::ValidationError;

/// Error type returned by user processing functions and bundle hooks.
pub type ProcessError = Box<dyn StdError + Send + Sync + 'static>;

/// Where the producer was waiting when the bundle was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPoint {
    /// Waiting in `submit` for an admission ticket
    Admission,
    /// Waiting in `finish` for in-flight work to drain
    Drain,
}

impl fmt::Display for CancelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelPoint::Admission => write!(f, "waiting for an admission ticket"),
            CancelPoint::Drain => write!(f, "draining in-flight work"),
        }
    }
}

/// The first unrecoverable error observed by a worker of a bundle.
///
/// Cloning shares the captured cause; it is never copied or re-wrapped.
#[derive(Clone)]
pub struct WorkItemFailure {
    item: u64,
    cause: Arc<dyn StdError + Send + Sync + 'static>,
}

impl WorkItemFailure {
    pub fn new(item: u64, cause: ProcessError) -> Self {
        Self {
            item,
            cause: Arc::from(cause),
        }
    }

    /// Sequence number (within the bundle) of the item whose worker failed.
    pub fn item(&self) -> u64 {
        self.item
    }

    /// The error exactly as the processing function returned it.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }

    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.cause.downcast_ref::<T>()
    }

    /// True when both handles refer to the same captured error.
    pub fn is_same_failure(&self, other: &WorkItemFailure) -> bool {
        Arc::ptr_eq(&self.cause, &other.cause)
    }
}

impl fmt::Display for WorkItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.cause, f)
    }
}

impl fmt::Debug for WorkItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItemFailure")
            .field("item", &self.item)
            .field("cause", &self.cause)
            .finish()
    }
}

/// Transparent like `#[error(transparent)]`: the failure displays as its cause, so the
/// chain continues at the cause's own source. Returning the cause here would print it
/// twice in a `{:#}` or report-style walk.
impl StdError for WorkItemFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.source()
    }
}

/// Recorded in place of a user error when a worker panicked or its task was dropped
/// before it could report an outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("worker for item {item} terminated before completing (panic or dropped task)")]
pub struct WorkerPanicked {
    pub item: u64,
}

/// Errors returned by the dispatch engine's lifecycle operations.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    /// Bad construction parameters; raised eagerly, never retried.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),

    /// The producer was cancelled while blocked on admission or drain.
    #[error("Bundle cancelled while {0}")]
    Cancelled(CancelPoint),

    /// The bundle's terminal failure, re-raised as captured.
    #[error(transparent)]
    WorkItemFailure(WorkItemFailure),

    /// `start`, `submit` and `finish` were called out of order.
    #[error("Lifecycle violation: {0}")]
    LifecycleViolation(String),

    /// The processor's `start_bundle` or `finish_bundle` hook failed.
    #[error("Processor '{processor}' {hook} hook failed: {cause}")]
    BundleHook {
        processor: String,
        hook: &'static str,
        cause: Arc<dyn StdError + Send + Sync + 'static>,
    },

    /// The execution backend refused to run a task.
    ///
    /// Never returned bare: it is recorded as the bundle's failure, so every raise,
    /// including the first, is a `WorkItemFailure` whose cause downcasts to this.
    #[error("Execution backend rejected work item {item}: {reason}")]
    Backend { item: u64, reason: String },
}

impl ExecutionError {
    pub fn work_item_failure(&self) -> Option<&WorkItemFailure> {
        match self {
            ExecutionError::WorkItemFailure(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionError::Cancelled(_))
    }
}

impl From<WorkItemFailure> for ExecutionError {
    fn from(failure: WorkItemFailure) -> Self {
        ExecutionError::WorkItemFailure(failure)
    }
}
