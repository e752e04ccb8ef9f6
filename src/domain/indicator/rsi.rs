//! RSI (Relative Strength Index) indicator.
//!
//! up = max(close - prev_close, 0), down = max(prev_close - close, 0)
//! avg_gain/avg_loss = EMA or Wilder average of up/down over n changes
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! avg_loss == 0 is a zero denominator: with safe division RSI clamps to 100
//! (or 50 when avg_gain is also 0), otherwise the bar is `Undefined`.
//!
//! Warmup: first n bars are not ready (n price changes are needed).

use super::{Ema, Reading, Smoothing};

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Rsi {
    prev_close: Option<f64>,
    gains: Ema,
    losses: Ema,
    safediv: bool,
    last: Reading<f64>,
}

impl Rsi {
    pub fn new(period: usize, smoothing: Smoothing, safediv: bool) -> Self {
        Rsi {
            prev_close: None,
            gains: Ema::with_smoothing(period, smoothing),
            losses: Ema::with_smoothing(period, smoothing),
            safediv,
            last: Reading::NotReady,
        }
    }

    pub fn update(&mut self, close: f64) -> Reading<f64> {
        let Some(prev) = self.prev_close.replace(close) else {
            self.last = Reading::NotReady;
            return self.last;
        };

        let change = close - prev;
        let gain = self.gains.update(change.max(0.0));
        let loss = self.losses.update((-change).max(0.0));

        self.last = match gain.zip(loss) {
            Reading::Ready((avg_gain, avg_loss)) => self.index(avg_gain, avg_loss),
            _ => Reading::NotReady,
        };
        self.last
    }

    fn index(&self, avg_gain: f64, avg_loss: f64) -> Reading<f64> {
        if avg_loss == 0.0 {
            if !self.safediv {
                return Reading::Undefined;
            }
            return Reading::Ready(if avg_gain == 0.0 { 50.0 } else { 100.0 });
        }
        Reading::Ready(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    }

    pub fn current(&self) -> Reading<f64> {
        self.last
    }

    pub fn reset(&mut self) {
        self.prev_close = None;
        self.gains.reset();
        self.losses.reset();
        self.last = Reading::NotReady;
    }
}
