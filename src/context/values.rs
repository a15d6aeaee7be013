// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event time of an element or output, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const MIN: Timestamp = Timestamp(i64::MIN);
    pub const MAX: Timestamp = Timestamp(i64::MAX);

    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// The window an element was assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Window {
    Global,
    /// Half-open interval `[start, end)`
    Interval { start: Timestamp, end: Timestamp },
}

impl Window {
    /// Largest timestamp that still falls inside the window.
    pub fn max_timestamp(&self) -> Timestamp {
        match self {
            Window::Global => Timestamp::MAX,
            Window::Interval { end, .. } => Timestamp::from_millis(end.millis() - 1),
        }
    }
}

/// Typed tag naming one side output.
pub struct TupleTag<T> {
    id: Arc<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TupleTag<T> {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Pair a value with this tag so it can travel through a type-erased emission call.
    pub fn value(&self, value: T) -> TaggedValue {
        TaggedValue {
            tag: self.id.clone(),
            value: Box::new(value),
        }
    }
}

impl<T> Clone for TupleTag<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TupleTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TupleTag").field(&self.id).finish()
    }
}

/// A side-output value together with the id of the tag it was emitted under.
pub struct TaggedValue {
    tag: Arc<str>,
    value: Box<dyn Any + Send + Sync>,
}

impl TaggedValue {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the value if it was emitted under `tag`.
    pub fn get<T: Any + Send + Sync>(&self, tag: &TupleTag<T>) -> Option<&T> {
        if *self.tag != *tag.id {
            return None;
        }
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedValue")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Typed handle for looking up one side input.
pub struct SideInputView<T> {
    id: Arc<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> SideInputView<T> {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<T> Clone for SideInputView<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _marker: PhantomData,
        }
    }
}

/// Read-only side input values available to every element of a bundle.
#[derive(Default, Clone)]
pub struct SideInputs(HashMap<Arc<str>, Arc<dyn Any + Send + Sync>>);

impl SideInputs {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, view: &SideInputView<T>, value: T) {
        self.0.insert(view.id.clone(), Arc::new(value));
    }

    pub fn get<T: Any + Send + Sync>(&self, view: &SideInputView<T>) -> Option<&T> {
        self.0.get(&view.id).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SideInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideInputs")
            .field("views", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}
