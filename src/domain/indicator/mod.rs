//! Technical indicator implementations.
//!
//! Every indicator is an owned, incrementally updated struct. Feeding it one
//! observation per bar yields a [`Reading`]:
//! - `NotReady`: the lookback window is not full yet
//! - `Undefined`: a ratio hit a zero denominator with safe division disabled
//! - `Ready(v)`: a usable value
//!
//! `current()` returns the last reading without consuming a bar, which is
//! how strategies look one bar back (turtle breakout, CMA trend).

pub mod bollinger;
pub mod crossover;
pub mod ema;
pub mod extreme;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;

pub use bollinger::{Bollinger, BollingerBands};
pub use crossover::{Cross, CrossOver};
pub use ema::{Ema, Smoothing};
pub use extreme::{Highest, Lowest};
pub use macd::{Macd, MacdValue};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticParams, StochasticValue};
pub use vwap::Vwap;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    NotReady,
    Undefined,
    Ready(T),
}

impl<T: Copy> Reading<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Reading::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Reading::Ready(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::NotReady => Reading::NotReady,
            Reading::Undefined => Reading::Undefined,
            Reading::Ready(v) => Reading::Ready(f(v)),
        }
    }

    /// Combine two readings; `Undefined` wins over `NotReady`.
    pub fn zip<U: Copy>(self, other: Reading<U>) -> Reading<(T, U)> {
        match (self, other) {
            (Reading::Ready(a), Reading::Ready(b)) => Reading::Ready((a, b)),
            (Reading::Undefined, _) | (_, Reading::Undefined) => Reading::Undefined,
            _ => Reading::NotReady,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::NotReady => write!(f, "not ready"),
            Reading::Undefined => write!(f, "undefined"),
            Reading::Ready(v) => write!(f, "{v}"),
        }
    }
}
