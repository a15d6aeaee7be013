// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution contexts handed to processors.
//!
//! A [`ProcessContext`] gives a processor access to the element it is working on, the
//! bundle's side inputs and pipeline options, and the emission calls that write to the
//! single downstream consumer. [`BundleContext`] is the subset available to the
//! `start_bundle` / `finish_bundle` hooks.
//!
//! Emission is type-erased for side outputs: a [`TupleTag`] pairs a value with its tag
//! (`tag.value(v)`), and the sink recovers it with the same tag.
//!
//! ```rust
//! use bundle_parallel::context::{CollectingSink, TupleTag};
//!
//! let rejected: TupleTag<String> = TupleTag::new("rejected");
//! let sink: CollectingSink<u32> = CollectingSink::new();
//! assert!(sink.side_values(&rejected).is_empty());
//! ```

mod aggregator;
mod element;
mod sink;
mod values;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::PipelineOptions;

pub use aggregator::{Aggregator, Aggregators, Combiner};
pub use element::{BundleScope, ElementContext};
pub use sink::{CollectingSink, Emission, OutputSink};
pub use values::{SideInputView, SideInputs, TaggedValue, Timestamp, TupleTag, Window};

/// Bundle-level view: configuration, aggregators and timestamped emission.
#[async_trait]
pub trait BundleContext<O: Send + 'static>: Send + Sync {
    fn pipeline_options(&self) -> &PipelineOptions;

    fn create_aggregator(&self, name: &str, combiner: Combiner) -> Arc<Aggregator>;

    async fn output_with_timestamp(&self, output: O, timestamp: Timestamp);

    async fn side_output_with_timestamp(&self, output: TaggedValue, timestamp: Timestamp);
}

/// Per-element view handed to [`crate::traits::Processor::process_element`].
#[async_trait]
pub trait ProcessContext<I: Send + Sync + 'static, O: Send + 'static>: BundleContext<O> {
    fn element(&self) -> &I;

    fn side_inputs(&self) -> &SideInputs;

    fn timestamp(&self) -> Timestamp;

    fn window(&self) -> &Window;

    /// Emit to the main output at the element's timestamp.
    async fn output(&self, output: O);

    /// Emit to a tagged side output at the element's timestamp.
    async fn side_output(&self, output: TaggedValue);
}
