pub mod executor;
pub mod processor;

pub use executor::{ExecutionBackend, WorkerTask};
pub use processor::Processor;
