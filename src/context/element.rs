// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use super::aggregator::{Aggregator, Aggregators, Combiner};
use super::sink::{Emission, OutputSink};
use super::values::{SideInputs, TaggedValue, Timestamp, Window};
use super::{BundleContext, ProcessContext};
use crate::config::PipelineOptions;

/// State shared by every element of one bundle: options, side inputs, aggregators
/// and the downstream sink.
pub struct BundleScope<O: Send + 'static> {
    options: PipelineOptions,
    side_inputs: SideInputs,
    aggregators: Aggregators,
    sink: Arc<dyn OutputSink<O>>,
}

impl<O: Send + 'static> BundleScope<O> {
    pub fn new(options: PipelineOptions, sink: Arc<dyn OutputSink<O>>) -> Self {
        Self {
            options,
            side_inputs: SideInputs::new(),
            aggregators: Aggregators::new(),
            sink,
        }
    }

    pub fn with_side_inputs(mut self, side_inputs: SideInputs) -> Self {
        self.side_inputs = side_inputs;
        self
    }

    pub fn aggregators(&self) -> &Aggregators {
        &self.aggregators
    }

    pub fn side_inputs(&self) -> &SideInputs {
        &self.side_inputs
    }
}

#[async_trait]
impl<O: Send + 'static> BundleContext<O> for BundleScope<O> {
    fn pipeline_options(&self) -> &PipelineOptions {
        &self.options
    }

    fn create_aggregator(&self, name: &str, combiner: Combiner) -> Arc<Aggregator> {
        self.aggregators.get_or_create(name, combiner)
    }

    async fn output_with_timestamp(&self, output: O, timestamp: Timestamp) {
        self.sink
            .emit(Emission::Main {
                value: output,
                timestamp,
            })
            .await;
    }

    async fn side_output_with_timestamp(&self, output: TaggedValue, timestamp: Timestamp) {
        self.sink.emit(Emission::Side { output, timestamp }).await;
    }
}

/// Context for a single element, backed by its bundle's [`BundleScope`].
pub struct ElementContext<I, O: Send + 'static> {
    element: I,
    timestamp: Timestamp,
    window: Window,
    scope: Arc<BundleScope<O>>,
}

impl<I, O: Send + 'static> ElementContext<I, O> {
    /// An element in the global window with the minimum timestamp.
    pub fn new(element: I, scope: Arc<BundleScope<O>>) -> Self {
        Self {
            element,
            timestamp: Timestamp::MIN,
            window: Window::Global,
            scope,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn in_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }
}

#[async_trait]
impl<I, O> BundleContext<O> for ElementContext<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    fn pipeline_options(&self) -> &PipelineOptions {
        self.scope.pipeline_options()
    }

    fn create_aggregator(&self, name: &str, combiner: Combiner) -> Arc<Aggregator> {
        self.scope.create_aggregator(name, combiner)
    }

    async fn output_with_timestamp(&self, output: O, timestamp: Timestamp) {
        self.scope.output_with_timestamp(output, timestamp).await;
    }

    async fn side_output_with_timestamp(&self, output: TaggedValue, timestamp: Timestamp) {
        self.scope.side_output_with_timestamp(output, timestamp).await;
    }
}

#[async_trait]
impl<I, O> ProcessContext<I, O> for ElementContext<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    fn element(&self) -> &I {
        &self.element
    }

    fn side_inputs(&self) -> &SideInputs {
        &self.scope.side_inputs
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn window(&self) -> &Window {
        &self.window
    }

    async fn output(&self, output: O) {
        self.scope.output_with_timestamp(output, self.timestamp).await;
    }

    async fn side_output(&self, output: TaggedValue) {
        self.scope
            .side_output_with_timestamp(output, self.timestamp)
            .await;
    }
}
