// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// How values added to an aggregator are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combiner {
    Sum,
    Min,
    Max,
}

impl Combiner {
    fn identity(&self) -> i64 {
        match self {
            Combiner::Sum => 0,
            Combiner::Min => i64::MAX,
            Combiner::Max => i64::MIN,
        }
    }
}

/// A named counter that workers may update concurrently.
#[derive(Debug)]
pub struct Aggregator {
    name: String,
    combiner: Combiner,
    value: AtomicI64,
}

impl Aggregator {
    pub fn new(name: impl Into<String>, combiner: Combiner) -> Self {
        Self {
            name: name.into(),
            combiner,
            value: AtomicI64::new(combiner.identity()),
        }
    }

    pub fn add_value(&self, value: i64) {
        match self.combiner {
            Combiner::Sum => self.value.fetch_add(value, Ordering::Relaxed),
            Combiner::Min => self.value.fetch_min(value, Ordering::Relaxed),
            Combiner::Max => self.value.fetch_max(value, Ordering::Relaxed),
        };
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn combiner(&self) -> Combiner {
        self.combiner
    }
}

/// Bundle-wide registry of aggregators, keyed by name.
#[derive(Debug, Default)]
pub struct Aggregators {
    by_name: Mutex<HashMap<String, Arc<Aggregator>>>,
}

impl Aggregators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the aggregator registered under `name`, creating it on first use.
    ///
    /// The combiner of the first registration wins.
    pub fn get_or_create(&self, name: &str, combiner: Combiner) -> Arc<Aggregator> {
        let mut by_name = self.by_name.lock().unwrap_or_else(PoisonError::into_inner);
        by_name
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Aggregator::new(name, combiner)))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Aggregator>> {
        self.by_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
