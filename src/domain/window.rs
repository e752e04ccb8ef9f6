//! Fixed-capacity rolling window over the most recent observations.

use std::collections::VecDeque;

/// Ring buffer holding at most `capacity` values, oldest first.
///
/// Pushing into a full window evicts the oldest value. An indicator built on
/// a window is only meaningful once [`RollingWindow::is_full`] holds.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    capacity: usize,
    values: VecDeque<T>,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        RollingWindow {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the evicted one when the window was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() == self.capacity
    }

    /// Most recent value.
    pub fn latest(&self) -> Option<T> {
        self.values.back().copied()
    }

    /// Value `lag` bars before the most recent one (`lag == 0` is the latest).
    pub fn lagged(&self, lag: usize) -> Option<T> {
        let len = self.values.len();
        if lag >= len {
            return None;
        }
        self.values.get(len - 1 - lag).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl RollingWindow<f64> {
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }
}
