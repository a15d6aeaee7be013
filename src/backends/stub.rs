// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test doubles for the dispatch engine: instrumented processors, sinks and backends.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::backends::TokioBackend;
use crate::context::{BundleContext, Emission, OutputSink, ProcessContext};
use crate::errors::ProcessError;
use crate::traits::{ExecutionBackend, Processor, WorkerTask};

/// Error raised by [`FailingProcessor`] for configured elements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("example failure: {label}")]
pub struct ExampleError {
    pub label: &'static str,
}

/// Counts concurrent invocations of `process_element`.
#[derive(Default)]
pub struct ActivityProbe {
    active: AtomicUsize,
    max_active: AtomicUsize,
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl ActivityProbe {
    fn enter(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Sleeps, then emits `element * 2`.
pub struct DoublingProcessor {
    delay: Duration,
    pub probe: ActivityProbe,
}

impl DoublingProcessor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            probe: ActivityProbe::default(),
        }
    }
}

#[async_trait]
impl Processor<u32, u32> for DoublingProcessor {
    async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
        self.probe.enter();
        tokio::time::sleep(self.delay).await;
        ctx.output(*ctx.element() * 2).await;
        self.probe.exit();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "doubling"
    }
}

/// Emits each element unchanged, except configured elements which fail after their
/// own delay.
pub struct FailingProcessor {
    delay: Duration,
    failures: HashMap<u32, (Duration, &'static str)>,
    pub probe: ActivityProbe,
}

impl FailingProcessor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failures: HashMap::new(),
            probe: ActivityProbe::default(),
        }
    }

    pub fn fail_on(mut self, element: u32, after: Duration, label: &'static str) -> Self {
        self.failures.insert(element, (after, label));
        self
    }
}

#[async_trait]
impl Processor<u32, u32> for FailingProcessor {
    async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
        self.probe.enter();
        let element = *ctx.element();
        let outcome = match self.failures.get(&element) {
            Some(&(after, label)) => {
                tokio::time::sleep(after).await;
                Err(Box::new(ExampleError { label }) as ProcessError)
            }
            None => {
                tokio::time::sleep(self.delay).await;
                ctx.output(element).await;
                Ok(())
            }
        };
        self.probe.exit();
        outcome
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Panics on one element.
pub struct PanickingProcessor {
    pub panic_on: u32,
}

#[async_trait]
impl Processor<u32, u32> for PanickingProcessor {
    async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
        if *ctx.element() == self.panic_on {
            panic!("processor blew up on element {}", self.panic_on);
        }
        ctx.output(*ctx.element()).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

/// Each element waits for a permit released by the test.
pub struct GatedProcessor {
    pub release: Arc<Semaphore>,
    pub probe: ActivityProbe,
}

impl GatedProcessor {
    pub fn new() -> Self {
        Self {
            release: Arc::new(Semaphore::new(0)),
            probe: ActivityProbe::default(),
        }
    }
}

#[async_trait]
impl Processor<u32, u32> for GatedProcessor {
    async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
        self.probe.enter();
        let permit = self.release.acquire().await?;
        permit.forget();
        ctx.output(*ctx.element()).await;
        self.probe.exit();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

/// Blocks its thread for a fixed time, like a synchronous network client would.
pub struct BlockingSleepProcessor {
    delay: Duration,
    pub probe: ActivityProbe,
}

impl BlockingSleepProcessor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            probe: ActivityProbe::default(),
        }
    }
}

#[async_trait]
impl Processor<u32, u32> for BlockingSleepProcessor {
    async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
        self.probe.enter();
        std::thread::sleep(self.delay);
        ctx.output(*ctx.element()).await;
        self.probe.exit();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "blocking_sleep"
    }
}

/// Emits a unique marker string per element.
pub struct MarkerProcessor;

#[async_trait]
impl Processor<u32, String> for MarkerProcessor {
    async fn process_element(
        &self,
        ctx: &dyn ProcessContext<u32, String>,
    ) -> Result<(), ProcessError> {
        tokio::task::yield_now().await;
        ctx.output(format!("<marker-{:04}>", ctx.element())).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "marker"
    }
}

/// Records bundle hook calls and optionally fails them. `finish_bundle` emits
/// `u32::MAX` so tests can see hook output reach the sink.
pub struct LifecycleProcessor {
    pub fail_start: bool,
    pub fail_element: Option<u32>,
    pub fail_finish: bool,
    events: Mutex<Vec<&'static str>>,
}

impl LifecycleProcessor {
    pub fn new() -> Self {
        Self {
            fail_start: false,
            fail_element: None,
            fail_finish: false,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Processor<u32, u32> for LifecycleProcessor {
    async fn start_bundle(&self, _ctx: &dyn BundleContext<u32>) -> Result<(), ProcessError> {
        self.record("start_bundle");
        if self.fail_start {
            return Err(Box::new(ExampleError { label: "start" }));
        }
        Ok(())
    }

    async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
        if self.fail_element == Some(*ctx.element()) {
            return Err(Box::new(ExampleError { label: "element" }));
        }
        ctx.output(*ctx.element()).await;
        Ok(())
    }

    async fn finish_bundle(&self, ctx: &dyn BundleContext<u32>) -> Result<(), ProcessError> {
        self.record("finish_bundle");
        if self.fail_finish {
            return Err(Box::new(ExampleError { label: "finish" }));
        }
        ctx.output_with_timestamp(u32::MAX, crate::context::Timestamp::MAX)
            .await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "lifecycle"
    }
}

/// Writes each main output one character at a time, yielding between characters, so
/// unserialized concurrent emissions would interleave.
#[derive(Default)]
pub struct TornWriteSink {
    buffer: Mutex<String>,
}

impl TornWriteSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<String> {
        self.buffer
            .lock()
            .unwrap()
            .split('\n')
            .filter(|record| !record.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl OutputSink<String> for TornWriteSink {
    async fn emit(&self, emission: Emission<String>) {
        if let Emission::Main { value, .. } = emission {
            for ch in value.chars() {
                self.buffer.lock().unwrap().push(ch);
                tokio::task::yield_now().await;
            }
            self.buffer.lock().unwrap().push('\n');
        }
    }
}

/// Runs tasks on the current tokio runtime and counts what it sees.
pub struct InstrumentedBackend {
    inner: TokioBackend,
    submitted: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
}

impl InstrumentedBackend {
    pub fn new() -> Self {
        Self {
            inner: TokioBackend::new(tokio::runtime::Handle::current()),
            submitted: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

impl ExecutionBackend for InstrumentedBackend {
    fn submit(&self, task: WorkerTask) -> Result<(), String> {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        let failed = self.failed.clone();
        self.inner.submit(Box::pin(async move {
            let outcome = task.await;
            if outcome.is_err() {
                failed.fetch_add(1, Ordering::SeqCst);
            }
            outcome
        }))
    }

    fn name(&self) -> &'static str {
        "instrumented"
    }
}

/// Refuses every task.
pub struct RejectingBackend;

impl ExecutionBackend for RejectingBackend {
    fn submit(&self, _task: WorkerTask) -> Result<(), String> {
        Err("worker pool is shut down".to_string())
    }

    fn name(&self) -> &'static str {
        "rejecting"
    }
}
