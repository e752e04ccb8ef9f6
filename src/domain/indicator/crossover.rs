//! Crossover detector for two paired series.
//!
//! +1 when `a` moves from <= b to > b, -1 when it moves from >= b to < b,
//! 0 otherwise. The first paired observation has nothing to compare against
//! and is not ready.

use super::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cross {
    Up,
    Down,
    None,
}

impl Cross {
    pub fn as_i8(self) -> i8 {
        match self {
            Cross::Up => 1,
            Cross::Down => -1,
            Cross::None => 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrossOver {
    prev: Option<(f64, f64)>,
    last: Option<Cross>,
}

impl CrossOver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, a: f64, b: f64) -> Reading<Cross> {
        let cross = self.prev.map(|(pa, pb)| {
            if pa <= pb && a > b {
                Cross::Up
            } else if pa >= pb && a < b {
                Cross::Down
            } else {
                Cross::None
            }
        });
        self.prev = Some((a, b));
        self.last = cross;
        self.current()
    }

    pub fn current(&self) -> Reading<Cross> {
        match self.last {
            Some(c) => Reading::Ready(c),
            None => Reading::NotReady,
        }
    }

    /// Forget history, e.g. after an input series went undefined.
    pub fn reset(&mut self) {
        self.prev = None;
        self.last = None;
    }
}
