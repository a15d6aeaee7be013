// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // execution backends
pub mod config;     // config loading + runtime builder
pub mod context;    // element and bundle contexts
pub mod engine;     // bounded intra-bundle dispatch
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // processor and backend abstractions
