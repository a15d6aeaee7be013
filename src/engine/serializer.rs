// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Emission serialization for concurrent workers.
//!
//! Workers see their element's context through a [`SerializedContext`]: reads pass
//! straight through, emission calls hold the bundle's [`OutputLock`] for exactly the
//! duration of the downstream write.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::PipelineOptions;
use crate::context::{
    Aggregator, BundleContext, Combiner, ProcessContext, SideInputs, TaggedValue, Timestamp,
    Window,
};

/// One lock per bundle, shared by every worker's context.
#[derive(Clone, Default)]
pub struct OutputLock(Arc<Mutex<()>>);

impl OutputLock {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Facade over an element's context that serializes emission calls.
pub struct SerializedContext<'a, I: Send + Sync + 'static, O: Send + 'static> {
    inner: &'a dyn ProcessContext<I, O>,
    lock: &'a OutputLock,
}

impl<'a, I, O> SerializedContext<'a, I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    pub fn new(inner: &'a dyn ProcessContext<I, O>, lock: &'a OutputLock) -> Self {
        Self { inner, lock }
    }
}

#[async_trait]
impl<I, O> BundleContext<O> for SerializedContext<'_, I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    fn pipeline_options(&self) -> &PipelineOptions {
        self.inner.pipeline_options()
    }

    fn create_aggregator(&self, name: &str, combiner: Combiner) -> Arc<Aggregator> {
        self.inner.create_aggregator(name, combiner)
    }

    async fn output_with_timestamp(&self, output: O, timestamp: Timestamp) {
        let _guard = self.lock.0.lock().await;
        self.inner.output_with_timestamp(output, timestamp).await;
    }

    async fn side_output_with_timestamp(&self, output: TaggedValue, timestamp: Timestamp) {
        let _guard = self.lock.0.lock().await;
        self.inner.side_output_with_timestamp(output, timestamp).await;
    }
}

#[async_trait]
impl<I, O> ProcessContext<I, O> for SerializedContext<'_, I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    fn element(&self) -> &I {
        self.inner.element()
    }

    fn side_inputs(&self) -> &SideInputs {
        self.inner.side_inputs()
    }

    fn timestamp(&self) -> Timestamp {
        self.inner.timestamp()
    }

    fn window(&self) -> &Window {
        self.inner.window()
    }

    async fn output(&self, output: O) {
        let _guard = self.lock.0.lock().await;
        self.inner.output(output).await;
    }

    async fn side_output(&self, output: TaggedValue) {
        let _guard = self.lock.0.lock().await;
        self.inner.side_output(output).await;
    }
}
