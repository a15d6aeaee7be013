// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tokio::runtime::Handle;

use crate::observability::messages::engine::WorkerTaskFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::{ExecutionBackend, WorkerTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskMode {
    /// Poll tasks on the runtime's async workers.
    Async,
    /// Drive each task to completion on the runtime's blocking pool.
    Blocking,
}

/// Execution backend backed by a tokio runtime the host already owns.
///
/// Use [`TokioBackend::blocking`] when processors make synchronous calls (blocking
/// HTTP clients, file I/O) that must not stall the async workers.
#[derive(Debug, Clone)]
pub struct TokioBackend {
    handle: Handle,
    mode: TaskMode,
}

impl TokioBackend {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            mode: TaskMode::Async,
        }
    }

    /// Backend for the runtime the caller is running on.
    pub fn try_current() -> Result<Self, String> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| format!("No tokio runtime available: {}", e))
    }

    pub fn blocking(handle: Handle) -> Self {
        Self {
            handle,
            mode: TaskMode::Blocking,
        }
    }
}

impl ExecutionBackend for TokioBackend {
    fn submit(&self, task: WorkerTask) -> Result<(), String> {
        let backend = self.name();
        match self.mode {
            TaskMode::Async => {
                self.handle.spawn(async move {
                    if let Err(failure) = task.await {
                        WorkerTaskFailed {
                            backend,
                            item: failure.item(),
                            error: &failure,
                        }
                        .log();
                    }
                });
            }
            TaskMode::Blocking => {
                let handle = self.handle.clone();
                self.handle.spawn_blocking(move || {
                    if let Err(failure) = handle.block_on(task) {
                        WorkerTaskFailed {
                            backend,
                            item: failure.item(),
                            error: &failure,
                        }
                        .log();
                    }
                });
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        match self.mode {
            TaskMode::Async => "tokio",
            TaskMode::Blocking => "tokio_blocking",
        }
    }
}
