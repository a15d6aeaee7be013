use async_trait::async_trait;

use crate::context::{BundleContext, ProcessContext};
use crate::errors::ProcessError;

/// User processing logic applied to every element of a bundle.
///
/// `process_element` is invoked concurrently from several workers, so
/// implementations must be safe to share across threads. Emission calls made through
/// the context are serialized by the engine; everything else runs in parallel.
#[async_trait]
pub trait Processor<I: Send + Sync + 'static, O: Send + 'static>: Send + Sync {
    /// Runs once on the producer before any element is dispatched.
    async fn start_bundle(&self, _ctx: &dyn BundleContext<O>) -> Result<(), ProcessError> {
        Ok(())
    }

    async fn process_element(&self, ctx: &dyn ProcessContext<I, O>) -> Result<(), ProcessError>;

    /// Runs once on the producer after every dispatched element completed successfully.
    async fn finish_bundle(&self, _ctx: &dyn BundleContext<O>) -> Result<(), ProcessError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}
