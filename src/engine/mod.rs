// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod admission;
pub mod dispatch;
pub mod failure;
pub mod parallelization;
pub mod serializer;

pub use admission::{AdmissionGate, AdmissionTicket};
pub use dispatch::DispatchEngine;
pub use failure::FailureCell;
pub use parallelization::{Bound, IntraBundleParallelization, Unbound};
pub use serializer::{OutputLock, SerializedContext};
