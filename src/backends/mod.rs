// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution backend implementations for the dispatch engine.
//!
//! The dispatch engine never spawns work itself; it hands each admitted element to an
//! [`crate::traits::ExecutionBackend`] injected at `start`. The host owns the backend's
//! threads and sizing.
//!
//! # Available Backends
//!
//! ## Tokio Backend
//! Runs worker tasks on a tokio runtime the host already has:
//! - **Async mode**: tasks are spawned on the runtime's async workers
//! - **Blocking mode**: tasks are driven on the runtime's blocking pool, for
//!   processors that make synchronous calls
//!
//! ## Stub Backend (Test-Only)
//! Test doubles for engine development (only available in test builds):
//! - **InstrumentedBackend**: counts submitted and failed tasks
//! - **RejectingBackend**: refuses every task
//! - Processors that sleep, fail, panic or block on demand
//!
//! # Examples
//!
//! ```rust
//! use bundle_parallel::backends::TokioBackend;
//! use bundle_parallel::traits::ExecutionBackend;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), String> {
//! let backend = TokioBackend::try_current()?;
//! assert_eq!(backend.name(), "tokio");
//! # Ok(())
//! # }
//! ```

#[cfg(test)]
pub mod stub;
mod tokio_pool;

pub use tokio_pool::TokioBackend;
