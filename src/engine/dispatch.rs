// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded concurrent dispatch of one bundle's elements.
//!
//! The producer drives a [`DispatchEngine`] through exactly one `start`, any number of
//! `submit` calls and exactly one `finish`. Each `submit` blocks until an admission
//! ticket is free, which is the only backpressure on the producer; the element then
//! runs on the injected [`ExecutionBackend`] while the producer moves on.
//!
//! # Failure handling
//!
//! The first error escaping any worker is written to the bundle's [`FailureCell`].
//! Every later `submit` re-raises it instead of dispatching, and `finish` re-raises it
//! after the drain. Elements already in flight when the failure lands run to
//! completion; their outputs may already be downstream.
//!
//! # Execution Flow
//!
//! ```text
//! submit ──► acquire ticket ──► failure set? ──yes──► release ticket, re-raise
//!                                   │ no
//!                                   ▼
//!                         backend.submit(worker)
//!                                   │
//!                  worker: process_element(serialized ctx)
//!                          record first failure
//!                          release ticket
//!
//! finish ──► acquire all tickets ──► failure set? ──yes──► re-raise
//!                                        │ no
//!                                        ▼
//!                                  finish_bundle hook
//! ```

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use super::admission::{AdmissionGate, AdmissionTicket};
use super::failure::FailureCell;
use super::serializer::{OutputLock, SerializedContext};
use crate::config::validate_max_parallelism;
use crate::context::{BundleContext, ProcessContext};
use crate::errors::{
    CancelPoint, ExecutionError, ProcessError, WorkItemFailure, WorkerPanicked,
};
use crate::observability::messages::engine::{
    AdmissionCancelled, BundleDrained, BundleFailed, BundleStarted, InterleavedFailureDropped,
    WorkItemDispatched, WorkItemFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExecutionBackend, Processor};

/// Per-bundle engine running a [`Processor`] over elements with bounded concurrency.
///
/// One engine serves exactly one bundle and is not reusable.
pub struct DispatchEngine<I: Send + Sync + 'static, O: Send + 'static> {
    processor: Arc<dyn Processor<I, O>>,
    max_parallelism: usize,
    cancellation: CancellationToken,
    state: EngineState,
}

enum EngineState {
    Created,
    Started(Running),
    Finished,
}

/// Resources allocated by `start` and released when the bundle finishes.
struct Running {
    gate: Arc<AdmissionGate>,
    failure: Arc<FailureCell>,
    output_lock: OutputLock,
    backend: Arc<dyn ExecutionBackend>,
    next_item: u64,
    started_at: Instant,
    span: Span,
}

impl<I, O> DispatchEngine<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    /// Create an engine admitting at most `max_parallelism` elements at once.
    ///
    /// Fails with `InvalidConfiguration` unless `max_parallelism` is positive.
    pub fn new(
        processor: Arc<dyn Processor<I, O>>,
        max_parallelism: i64,
    ) -> Result<Self, ExecutionError> {
        let max_parallelism = validate_max_parallelism(max_parallelism)?;
        Ok(Self::with_validated(processor, max_parallelism))
    }

    pub(crate) fn with_validated(processor: Arc<dyn Processor<I, O>>, max_parallelism: usize) -> Self {
        Self {
            processor,
            max_parallelism,
            cancellation: CancellationToken::new(),
            state: EngineState::Created,
        }
    }

    /// Token that aborts a producer blocked in `submit` or `finish`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    pub fn processor_name(&self) -> &'static str {
        self.processor.name()
    }

    /// Admission tickets currently held by in-flight elements.
    pub fn outstanding(&self) -> usize {
        match &self.state {
            EngineState::Started(running) => running.gate.outstanding(),
            _ => 0,
        }
    }

    /// Elements handed to the backend so far.
    pub fn dispatched(&self) -> u64 {
        match &self.state {
            EngineState::Started(running) => running.next_item,
            _ => 0,
        }
    }

    /// The bundle's captured failure, if a worker has failed.
    pub fn failure(&self) -> Option<WorkItemFailure> {
        match &self.state {
            EngineState::Started(running) => running.failure.get(),
            _ => None,
        }
    }

    /// Worker failures discarded because an earlier failure was already captured.
    pub fn dropped_failures(&self) -> usize {
        match &self.state {
            EngineState::Started(running) => running.failure.dropped(),
            _ => 0,
        }
    }

    /// Run the processor's `start_bundle` hook and allocate the bundle's admission
    /// gate, failure cell and output lock. `backend` runs every dispatched element.
    pub async fn start(
        &mut self,
        backend: Arc<dyn ExecutionBackend>,
        ctx: &dyn BundleContext<O>,
    ) -> Result<(), ExecutionError> {
        match self.state {
            EngineState::Created => {}
            EngineState::Started(_) => {
                return Err(ExecutionError::LifecycleViolation(
                    "start called on a bundle that is already running".to_string(),
                ))
            }
            EngineState::Finished => {
                return Err(ExecutionError::LifecycleViolation(
                    "start called on a finished bundle".to_string(),
                ))
            }
        }

        let processor = self.processor.name();
        let started = BundleStarted {
            processor,
            max_parallelism: self.max_parallelism,
        };
        let span = started.span("bundle");

        if let Err(cause) = self.processor.start_bundle(ctx).instrument(span.clone()).await {
            self.state = EngineState::Finished;
            return Err(hook_error(processor, "start_bundle", cause));
        }

        let gate = AdmissionGate::with_validated(self.max_parallelism, self.cancellation.clone());
        span.in_scope(|| started.log());

        self.state = EngineState::Started(Running {
            gate: Arc::new(gate),
            failure: Arc::new(FailureCell::new()),
            output_lock: OutputLock::new(),
            backend,
            next_item: 0,
            started_at: Instant::now(),
            span,
        });
        Ok(())
    }

    /// Admit one element and hand it to the backend.
    ///
    /// Blocks while `max_parallelism` elements are in flight. Once any worker has
    /// failed, returns that failure without dispatching.
    pub async fn submit<C>(&mut self, item: C) -> Result<(), ExecutionError>
    where
        C: ProcessContext<I, O> + 'static,
    {
        let running = match &mut self.state {
            EngineState::Started(running) => running,
            EngineState::Created => {
                return Err(ExecutionError::LifecycleViolation(
                    "submit called before start".to_string(),
                ))
            }
            EngineState::Finished => {
                return Err(ExecutionError::LifecycleViolation(
                    "submit called after the bundle finished".to_string(),
                ))
            }
        };

        let ticket = match running.gate.acquire().await {
            Ok(ticket) => ticket,
            Err(e) => {
                running.span.in_scope(|| {
                    AdmissionCancelled {
                        point: CancelPoint::Admission,
                        outstanding: running.gate.outstanding(),
                    }
                    .log()
                });
                return Err(e);
            }
        };

        if let Some(failure) = running.failure.get() {
            ticket.release();
            return Err(failure.into());
        }

        let item_index = running.next_item;
        running.next_item += 1;

        let dispatched = WorkItemDispatched {
            item: item_index,
            outstanding: running.gate.outstanding(),
        };
        let item_span = running.span.in_scope(|| {
            dispatched.log();
            dispatched.span("work_item")
        });

        let worker = run_worker(
            self.processor.clone(),
            item,
            ticket,
            running.failure.clone(),
            running.output_lock.clone(),
            item_index,
        );

        if let Err(reason) = running.backend.submit(Box::pin(worker.instrument(item_span))) {
            let failure = WorkItemFailure::new(
                item_index,
                Box::new(ExecutionError::Backend {
                    item: item_index,
                    reason,
                }),
            );
            running.failure.try_set(failure.clone());
            return Err(failure.into());
        }
        Ok(())
    }

    /// Wait for every dispatched element to complete, then surface the captured
    /// failure or run the processor's `finish_bundle` hook.
    pub async fn finish(&mut self, ctx: &dyn BundleContext<O>) -> Result<(), ExecutionError> {
        let running = match std::mem::replace(&mut self.state, EngineState::Finished) {
            EngineState::Started(running) => running,
            EngineState::Created => {
                self.state = EngineState::Created;
                return Err(ExecutionError::LifecycleViolation(
                    "finish called before start".to_string(),
                ));
            }
            EngineState::Finished => {
                return Err(ExecutionError::LifecycleViolation(
                    "finish called on a finished bundle".to_string(),
                ))
            }
        };

        let processor = self.processor.name();
        let _drained = match running.gate.acquire_all().await {
            Ok(drained) => drained,
            Err(e) => {
                running.span.in_scope(|| {
                    AdmissionCancelled {
                        point: CancelPoint::Drain,
                        outstanding: running.gate.outstanding(),
                    }
                    .log()
                });
                return Err(e);
            }
        };

        if let Some(failure) = running.failure.get() {
            running.span.in_scope(|| {
                BundleFailed {
                    processor,
                    failed_item: failure.item(),
                    items: running.next_item,
                    error: &failure,
                }
                .log()
            });
            return Err(failure.into());
        }

        self.processor
            .finish_bundle(ctx)
            .instrument(running.span.clone())
            .await
            .map_err(|cause| hook_error(processor, "finish_bundle", cause))?;

        running.span.in_scope(|| {
            BundleDrained {
                processor,
                items: running.next_item,
                duration: running.started_at.elapsed(),
            }
            .log()
        });
        Ok(())
    }
}

fn hook_error(processor: &str, hook: &'static str, cause: ProcessError) -> ExecutionError {
    ExecutionError::BundleHook {
        processor: processor.to_string(),
        hook,
        cause: Arc::from(cause),
    }
}

/// Worker body for one element. Runs on the backend.
async fn run_worker<I, O, C>(
    processor: Arc<dyn Processor<I, O>>,
    item: C,
    ticket: AdmissionTicket,
    failure: Arc<FailureCell>,
    output_lock: OutputLock,
    item_index: u64,
) -> Result<(), WorkItemFailure>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
    C: ProcessContext<I, O> + 'static,
{
    let guard = WorkerGuard {
        ticket: Some(ticket),
        failure,
        processor: processor.name(),
        item: item_index,
        completed: false,
    };
    let ctx = SerializedContext::new(&item, &output_lock);
    let outcome = processor.process_element(&ctx).await;
    guard.complete(outcome)
}

/// Holds a worker's admission ticket and makes sure the worker's outcome is recorded
/// before the ticket goes back to the gate, on every exit path.
struct WorkerGuard {
    ticket: Option<AdmissionTicket>,
    failure: Arc<FailureCell>,
    processor: &'static str,
    item: u64,
    completed: bool,
}

impl WorkerGuard {
    fn complete(mut self, outcome: Result<(), ProcessError>) -> Result<(), WorkItemFailure> {
        self.completed = true;
        outcome.map_err(|cause| {
            let failure = WorkItemFailure::new(self.item, cause);
            self.record(failure.clone());
            failure
        })
    }

    fn record(&self, failure: WorkItemFailure) {
        if self.failure.try_set(failure.clone()) {
            WorkItemFailed {
                processor: self.processor,
                item: self.item,
                error: &failure,
            }
            .log();
        } else {
            InterleavedFailureDropped {
                processor: self.processor,
                item: self.item,
                error: &failure,
            }
            .log();
        }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if !self.completed {
            self.record(WorkItemFailure::new(
                self.item,
                Box::new(WorkerPanicked { item: self.item }),
            ));
        }
        if let Some(ticket) = self.ticket.take() {
            ticket.release();
        }
    }
}
