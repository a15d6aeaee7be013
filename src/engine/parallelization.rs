// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Builder surface for running a processor with intra-bundle parallelism.
//!
//! ```rust
//! use async_trait::async_trait;
//! use bundle_parallel::context::ProcessContext;
//! use bundle_parallel::engine::{Bound, IntraBundleParallelization};
//! use bundle_parallel::errors::ProcessError;
//! use bundle_parallel::traits::Processor;
//!
//! struct Lookup;
//!
//! #[async_trait]
//! impl Processor<String, String> for Lookup {
//!     async fn process_element(
//!         &self,
//!         ctx: &dyn ProcessContext<String, String>,
//!     ) -> Result<(), ProcessError> {
//!         ctx.output(ctx.element().to_uppercase()).await;
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "lookup"
//!     }
//! }
//!
//! let bound: Bound<String, String> = IntraBundleParallelization::with_max_parallelism(4)?.of(Lookup);
//! assert_eq!(bound.max_parallelism(), 4);
//! assert_eq!(bound.processor_name(), "lookup");
//! # Ok::<(), bundle_parallel::errors::ExecutionError>(())
//! ```

use std::sync::Arc;

use super::dispatch::DispatchEngine;
use crate::config::consts::DEFAULT_MAX_PARALLELISM;
use crate::config::validate_max_parallelism;
use crate::context::{BundleScope, ElementContext};
use crate::errors::ExecutionError;
use crate::traits::{ExecutionBackend, Processor};

/// Entry point for wrapping a processor so each bundle's elements run concurrently.
pub struct IntraBundleParallelization;

impl IntraBundleParallelization {
    /// Wrap `processor` with the default parallelism.
    pub fn of<I, O, P>(processor: P) -> Bound<I, O>
    where
        I: Send + Sync + 'static,
        O: Send + 'static,
        P: Processor<I, O> + 'static,
    {
        Unbound::default().of(processor)
    }

    /// Start a builder with an explicit parallelism, validated immediately.
    pub fn with_max_parallelism(max_parallelism: i64) -> Result<Unbound, ExecutionError> {
        Unbound::default().with_max_parallelism(max_parallelism)
    }
}

/// Parallelism chosen, processor not yet supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unbound {
    max_parallelism: usize,
}

impl Default for Unbound {
    fn default() -> Self {
        Self {
            max_parallelism: DEFAULT_MAX_PARALLELISM,
        }
    }
}

impl Unbound {
    pub fn with_max_parallelism(self, max_parallelism: i64) -> Result<Self, ExecutionError> {
        Ok(Self {
            max_parallelism: validate_max_parallelism(max_parallelism)?,
        })
    }

    pub fn of<I, O, P>(self, processor: P) -> Bound<I, O>
    where
        I: Send + Sync + 'static,
        O: Send + 'static,
        P: Processor<I, O> + 'static,
    {
        Bound {
            processor: Arc::new(processor),
            max_parallelism: self.max_parallelism,
        }
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }
}

/// A processor paired with its parallelism; produces one engine per bundle.
pub struct Bound<I: Send + Sync + 'static, O: Send + 'static> {
    processor: Arc<dyn Processor<I, O>>,
    max_parallelism: usize,
}

impl<I, O> Clone for Bound<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            processor: self.processor.clone(),
            max_parallelism: self.max_parallelism,
        }
    }
}

impl<I, O> Bound<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    pub fn with_max_parallelism(self, max_parallelism: i64) -> Result<Self, ExecutionError> {
        Ok(Self {
            processor: self.processor,
            max_parallelism: validate_max_parallelism(max_parallelism)?,
        })
    }

    /// Same parallelism, different processor.
    pub fn of<P>(self, processor: P) -> Bound<I, O>
    where
        P: Processor<I, O> + 'static,
    {
        Bound {
            processor: Arc::new(processor),
            max_parallelism: self.max_parallelism,
        }
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    pub fn processor_name(&self) -> &'static str {
        self.processor.name()
    }

    /// A fresh engine for one bundle.
    pub fn new_engine(&self) -> DispatchEngine<I, O> {
        DispatchEngine::with_validated(self.processor.clone(), self.max_parallelism)
    }

    /// Process `elements` as one bundle: `start`, one `submit` per element, `finish`.
    ///
    /// Stops submitting at the first error but still drains, so nothing reaches the
    /// sink after this returns. A submit error wins over whatever `finish` reports.
    pub async fn run_bundle<E>(
        &self,
        backend: Arc<dyn ExecutionBackend>,
        scope: Arc<BundleScope<O>>,
        elements: E,
    ) -> Result<(), ExecutionError>
    where
        E: IntoIterator<Item = I>,
    {
        let mut engine = self.new_engine();
        engine.start(backend, scope.as_ref()).await?;
        let mut submit_error = None;
        for element in elements {
            if let Err(e) = engine
                .submit(ElementContext::new(element, scope.clone()))
                .await
            {
                submit_error = Some(e);
                break;
            }
        }

        let finished = engine.finish(scope.as_ref()).await;
        match submit_error {
            Some(e) => Err(e),
            None => finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{DoublingProcessor, FailingProcessor};
    use std::time::Duration;

    #[test]
    fn test_default_parallelism_is_sixteen() {
        let bound: Bound<u32, u32> =
            IntraBundleParallelization::of(DoublingProcessor::new(Duration::ZERO));
        assert_eq!(bound.max_parallelism(), 16);
        assert_eq!(bound.processor_name(), "doubling");
    }

    #[test]
    fn test_invalid_parallelism_fails_eagerly() {
        for bad in [0, -5] {
            let err = IntraBundleParallelization::with_max_parallelism(bad).unwrap_err();
            assert!(matches!(err, ExecutionError::InvalidConfiguration(_)));
            assert!(err
                .to_string()
                .contains("Expected parallelism factor greater than zero"));
        }

        let bound: Bound<u32, u32> =
            IntraBundleParallelization::of(DoublingProcessor::new(Duration::ZERO));
        assert!(bound.with_max_parallelism(0).is_err());
    }

    #[test]
    fn test_rebinding_keeps_parallelism() {
        let bound: Bound<u32, u32> = IntraBundleParallelization::with_max_parallelism(3)
            .unwrap()
            .of(DoublingProcessor::new(Duration::ZERO));
        let rebound = bound.of(FailingProcessor::new(Duration::ZERO));
        assert_eq!(rebound.max_parallelism(), 3);
        assert_eq!(rebound.processor_name(), "failing");
    }

    #[test]
    fn test_each_engine_is_independent() {
        let bound: Bound<u32, u32> = IntraBundleParallelization::with_max_parallelism(5)
            .unwrap()
            .of(DoublingProcessor::new(Duration::ZERO));
        let first = bound.new_engine();
        let second = bound.new_engine();
        assert_eq!(first.max_parallelism(), 5);
        assert_eq!(second.max_parallelism(), 5);
        assert!(!first
            .cancellation_token()
            .is_cancelled());
        first.cancellation_token().cancel();
        assert!(!second.cancellation_token().is_cancelled());
    }
}
