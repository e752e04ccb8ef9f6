//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: slow - 1 + signal - 1 bars

use super::{Ema, Reading};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    last: Reading<MacdValue>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Macd {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
            last: Reading::NotReady,
        }
    }

    pub fn update(&mut self, close: f64) -> Reading<MacdValue> {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);

        self.last = match fast.zip(slow) {
            Reading::Ready((f, s)) => {
                let line = f - s;
                self.signal.update(line).map(|signal| MacdValue {
                    line,
                    signal,
                    histogram: line - signal,
                })
            }
            _ => Reading::NotReady,
        };
        self.last
    }

    pub fn current(&self) -> Reading<MacdValue> {
        self.last
    }

    pub fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.last = Reading::NotReady;
    }
}

impl Default for Macd {
    fn default() -> Self {
        Macd::new(DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
    }
}
