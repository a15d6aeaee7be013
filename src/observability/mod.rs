// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the crate. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between log events and spans
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - Bundle lifecycle, dispatch and failure events
//! * `messages::config` - Configuration loading events
//!
//! # Usage
//!
//! ```rust
//! use bundle_parallel::observability::messages::engine::BundleStarted;
//! use bundle_parallel::observability::messages::StructuredLog;
//!
//! let msg = BundleStarted {
//!     processor: "enrich",
//!     max_parallelism: 16,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
