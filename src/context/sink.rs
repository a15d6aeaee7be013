// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::any::Any;
use std::sync::{Mutex, PoisonError};

use super::values::{TaggedValue, Timestamp, TupleTag};

/// One write to the downstream consumer.
#[derive(Debug)]
pub enum Emission<O> {
    Main { value: O, timestamp: Timestamp },
    Side { output: TaggedValue, timestamp: Timestamp },
}

/// The single downstream consumer of a bundle.
///
/// Implementations need not tolerate concurrent calls: the dispatch engine
/// serializes every emission made from its workers.
#[async_trait]
pub trait OutputSink<O: Send + 'static>: Send + Sync {
    async fn emit(&self, emission: Emission<O>);
}

/// In-memory sink that records every emission in arrival order.
pub struct CollectingSink<O> {
    emissions: Mutex<Vec<Emission<O>>>,
}

impl<O> CollectingSink<O> {
    pub fn new() -> Self {
        Self {
            emissions: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<O: Clone> CollectingSink<O> {
    /// Main-output values in arrival order.
    pub fn main_values(&self) -> Vec<O> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|emission| match emission {
                Emission::Main { value, .. } => Some(value.clone()),
                Emission::Side { .. } => None,
            })
            .collect()
    }

    /// Main-output values paired with their timestamps.
    pub fn timestamped_values(&self) -> Vec<(O, Timestamp)> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|emission| match emission {
                Emission::Main { value, timestamp } => Some((value.clone(), *timestamp)),
                Emission::Side { .. } => None,
            })
            .collect()
    }
}

impl<O> CollectingSink<O> {
    /// Values emitted under `tag`, in arrival order.
    pub fn side_values<T: Any + Send + Sync + Clone>(&self, tag: &TupleTag<T>) -> Vec<T> {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|emission| match emission {
                Emission::Side { output, .. } => output.get(tag).cloned(),
                Emission::Main { .. } => None,
            })
            .collect()
    }
}

impl<O> Default for CollectingSink<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<O: Send + 'static> OutputSink<O> for CollectingSink<O> {
    async fn emit(&self, emission: Emission<O>) {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(emission);
    }
}
