// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Admission gate: a counting semaphore bounding in-flight elements.
//!
//! One ticket is held per dispatched element from the moment the producer admits it
//! until its worker has finished, failure recording included. Draining takes every
//! ticket at once, which can only succeed when nothing is in flight.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::config::validate_max_parallelism;
use crate::errors::{CancelPoint, ExecutionError};

/// Bounds the number of elements in flight for one bundle.
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
    cancellation: CancellationToken,
}

/// Permission for one element to be in flight. Returned to the gate on drop.
#[derive(Debug)]
pub struct AdmissionTicket {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionTicket {
    /// Return the ticket to the gate.
    pub fn release(self) {}
}

/// Proof that every ticket is back at the gate; holding it keeps the gate closed.
#[derive(Debug)]
pub struct DrainedGate {
    _permits: OwnedSemaphorePermit,
}

impl AdmissionGate {
    /// Capacity is signed like every public parallelism input, so zero and negative
    /// values are rejected here rather than wrapping.
    pub fn new(capacity: i64, cancellation: CancellationToken) -> Result<Self, ExecutionError> {
        let capacity = validate_max_parallelism(capacity)?;
        Ok(Self::with_validated(capacity, cancellation))
    }

    pub(crate) fn with_validated(capacity: usize, cancellation: CancellationToken) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            cancellation,
        }
    }

    /// Block until a ticket is available.
    ///
    /// Returns `Cancelled(Admission)` if the cancellation token fires first.
    pub async fn acquire(&self) -> Result<AdmissionTicket, ExecutionError> {
        let permits = self.permits.clone();
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                Err(ExecutionError::Cancelled(CancelPoint::Admission))
            }
            res = permits.acquire_owned() => match res {
                Ok(permit) => Ok(AdmissionTicket { _permit: permit }),
                Err(_) => Err(ExecutionError::Cancelled(CancelPoint::Admission)),
            }
        }
    }

    /// Block until every ticket has been returned.
    ///
    /// Returns `Cancelled(Drain)` if the cancellation token fires first.
    pub async fn acquire_all(&self) -> Result<DrainedGate, ExecutionError> {
        let permits = self.permits.clone();
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                Err(ExecutionError::Cancelled(CancelPoint::Drain))
            }
            res = permits.acquire_many_owned(self.capacity as u32) => match res {
                Ok(permit) => Ok(DrainedGate { _permits: permit }),
                Err(_) => Err(ExecutionError::Cancelled(CancelPoint::Drain)),
            }
        }
    }

    /// Tickets currently held by admitted elements.
    pub fn outstanding(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
