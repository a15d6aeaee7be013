// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, PipelineOptions};
use crate::engine::{Bound, IntraBundleParallelization};
use crate::errors::ExecutionError;
use crate::traits::Processor;

/// Bundle runtime builder - binds a processor to the parallelism a configuration asks for.
///
/// The `RuntimeBuilder` turns a loaded [`Config`] into the pieces a bundle runner
/// needs: a [`Bound`] transform that creates one engine per bundle, and the pipeline
/// options every element context exposes.
///
/// # Examples
///
/// ## Building runtime from configuration
/// ```
/// use async_trait::async_trait;
/// use bundle_parallel::config::{parse_config, ConfigFormat, RuntimeBuilder};
/// use bundle_parallel::context::ProcessContext;
/// use bundle_parallel::errors::ProcessError;
/// use bundle_parallel::traits::Processor;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Processor<u32, u32> for Echo {
///     async fn process_element(&self, ctx: &dyn ProcessContext<u32, u32>) -> Result<(), ProcessError> {
///         ctx.output(*ctx.element()).await;
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "echo"
///     }
/// }
///
/// let config = parse_config(
///     "parallelism:\n  max_parallelism: 4\npipeline_options:\n  job_name: echo-job\n",
///     ConfigFormat::Yaml,
/// ).unwrap();
///
/// let (transform, options) = RuntimeBuilder::from_config::<u32, u32, _>(&config, Echo).unwrap();
///
/// assert_eq!(transform.max_parallelism(), 4);
/// assert_eq!(options.job_name(), Some("echo-job"));
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the bundle runtime from configuration.
    ///
    /// Creates and returns:
    /// - `Bound<I, O>`: the processor bound to the configured parallelism
    /// - `PipelineOptions`: options to place in each bundle's scope
    ///
    /// # Arguments
    /// * `cfg` - Configuration with parallelism and pipeline options
    /// * `processor` - The processing logic to run on every element
    pub fn from_config<I, O, P>(
        cfg: &Config,
        processor: P,
    ) -> Result<(Bound<I, O>, PipelineOptions), ExecutionError>
    where
        I: Send + Sync + 'static,
        O: Send + 'static,
        P: Processor<I, O> + 'static,
    {
        cfg.pipeline_options.validate()?;
        let transform = IntraBundleParallelization::with_max_parallelism(
            cfg.parallelism.get_max_parallelism(),
        )?
        .of(processor);
        Ok((transform, cfg.pipeline_options.clone()))
    }
}
