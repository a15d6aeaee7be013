// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Write-once slot holding a bundle's first worker failure.

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::WorkItemFailure;

/// Captures the first failure raised by any worker of a bundle.
///
/// Only the first `try_set` wins; later failures are counted and discarded. Readers
/// never block writers.
#[derive(Default)]
pub struct FailureCell {
    slot: ArcSwapOption<WorkItemFailure>,
    dropped: AtomicUsize,
}

impl FailureCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `failure` if the cell is still empty. Returns `true` when this call won.
    pub fn try_set(&self, failure: WorkItemFailure) -> bool {
        let previous = self
            .slot
            .compare_and_swap(&None::<Arc<WorkItemFailure>>, Some(Arc::new(failure)));
        if previous.is_none() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// The captured failure, if any. Every call returns a handle to the same error.
    pub fn get(&self) -> Option<WorkItemFailure> {
        self.slot.load_full().map(|failure| (*failure).clone())
    }

    pub fn is_set(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Failures discarded because another was captured first.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
