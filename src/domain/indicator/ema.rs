//! Exponential moving average accumulator.
//!
//! alpha = 2/(n+1) (exponential) or 1/n (Wilder). Seeded with the SMA of the
//! first n inputs, then EMA = x*alpha + EMA*(1-alpha).
//! Warmup: first (n-1) inputs are not ready.

use super::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    Exponential,
    Wilder,
}

impl Smoothing {
    pub fn alpha(self, period: usize) -> f64 {
        match self {
            Smoothing::Exponential => 2.0 / (period as f64 + 1.0),
            Smoothing::Wilder => 1.0 / period as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self::with_smoothing(period, Smoothing::Exponential)
    }

    pub fn with_smoothing(period: usize, smoothing: Smoothing) -> Self {
        Ema {
            period,
            alpha: smoothing.alpha(period.max(1)),
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    pub fn update(&mut self, x: f64) -> Reading<f64> {
        if self.period == 0 {
            return Reading::NotReady;
        }
        match self.value {
            Some(prev) => {
                let next = x * self.alpha + prev * (1.0 - self.alpha);
                self.value = Some(next);
            }
            None => {
                self.seed_sum += x;
                self.seen += 1;
                if self.seen == self.period {
                    self.value = Some(self.seed_sum / self.period as f64);
                }
            }
        }
        self.current()
    }

    pub fn current(&self) -> Reading<f64> {
        match self.value {
            Some(v) => Reading::Ready(v),
            None => Reading::NotReady,
        }
    }

    /// Start from a known value instead of averaging the first window.
    pub fn seed(&mut self, value: f64) {
        self.seed_sum = 0.0;
        self.seen = self.period;
        self.value = Some(value);
    }

    pub fn reset(&mut self) {
        self.seed_sum = 0.0;
        self.seen = 0;
        self.value = None;
    }
}
