// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit the same event with typed fields, at the level
//! documented on the type.
//!
//! # Organization
//!
//! * `engine` - Bundle lifecycle, dispatch and failure events
//! * `config` - Configuration loading events
//!
//! # Usage Pattern
//!
//! ```rust
//! use bundle_parallel::observability::messages::engine::WorkItemDispatched;
//!
//! let msg = WorkItemDispatched {
//!     item: 3,
//!     outstanding: 2,
//! };
//!
//! tracing::debug!("{}", msg);
//! ```

pub mod config;
pub mod engine;

use std::fmt::Display;
use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
