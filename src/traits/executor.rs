use std::future::Future;
use std::pin::Pin;

use crate::errors::WorkItemFailure;

/// One unit of work handed to an execution backend: process a single element.
///
/// Resolves to `Err` when the element's processor failed, so backends can observe
/// worker failures the same way they observe any other task outcome.
pub type WorkerTask = Pin<Box<dyn Future<Output = Result<(), WorkItemFailure>> + Send + 'static>>;

/// The worker pool that runs dispatched elements.
///
/// Injected into the dispatch engine at `start`; its threads and sizing belong to the
/// host, not to the engine.
pub trait ExecutionBackend: Send + Sync {
    /// Accept a task for asynchronous execution and return immediately.
    ///
    /// Returns the rejection reason when the backend cannot run the task.
    fn submit(&self, task: WorkerTask) -> Result<(), String>;

    fn name(&self) -> &'static str;
}
