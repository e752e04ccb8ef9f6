//! Stochastic oscillator (%K/%D, the K and D lines of KDJ).
//!
//! raw %K = 100 * (close - LL(n)) / (HH(n) - LL(n))
//! %K = EMA(raw, k_smoothing), with k_smoothing = 1 leaving raw untouched
//! %D = EMA(%K, d_period)
//!
//! A zero high-low range either yields `safe_value` (safe division) or makes
//! the bar `Undefined`.

use super::{Ema, Highest, Lowest, Reading};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticParams {
    pub period: usize,
    pub d_period: usize,
    pub k_smoothing: usize,
    pub safediv: bool,
    pub safe_value: f64,
}

impl Default for StochasticParams {
    fn default() -> Self {
        StochasticParams {
            period: 1,
            d_period: 3,
            k_smoothing: 1,
            safediv: true,
            safe_value: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    params: StochasticParams,
    highest: Highest,
    lowest: Lowest,
    k_smooth: Ema,
    d_line: Ema,
    last: Reading<StochasticValue>,
}

impl Stochastic {
    pub fn new(params: StochasticParams) -> Self {
        Stochastic {
            params,
            highest: Highest::new(params.period),
            lowest: Lowest::new(params.period),
            k_smooth: Ema::new(params.k_smoothing),
            d_line: Ema::new(params.d_period),
            last: Reading::NotReady,
        }
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Reading<StochasticValue> {
        let hh = self.highest.update(high);
        let ll = self.lowest.update(low);

        self.last = match hh.zip(ll) {
            Reading::Ready((hh, ll)) => match self.raw_k(close, hh, ll) {
                Some(raw) => self.smooth(raw),
                None => Reading::Undefined,
            },
            _ => Reading::NotReady,
        };
        self.last
    }

    fn raw_k(&self, close: f64, hh: f64, ll: f64) -> Option<f64> {
        let range = hh - ll;
        if range == 0.0 {
            return self.params.safediv.then_some(self.params.safe_value);
        }
        Some(100.0 * (close - ll) / range)
    }

    fn smooth(&mut self, raw: f64) -> Reading<StochasticValue> {
        let k = if self.params.k_smoothing <= 1 {
            Reading::Ready(raw)
        } else {
            self.k_smooth.update(raw)
        };
        match k {
            Reading::Ready(k) => self.d_line.update(k).map(|d| StochasticValue { k, d }),
            other => other.map(|k| StochasticValue { k, d: k }),
        }
    }

    pub fn current(&self) -> Reading<StochasticValue> {
        self.last
    }

    pub fn reset(&mut self) {
        self.highest.reset();
        self.lowest.reset();
        self.k_smooth.reset();
        self.d_line.reset();
        self.last = Reading::NotReady;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(period: usize, d_period: usize, safediv: bool) -> StochasticParams {
        StochasticParams {
            period,
            d_period,
            k_smoothing: 1,
            safediv,
            safe_value: 50.0,
        }
    }

    #[test]
    fn raw_k_position_in_range() {
        let mut s = Stochastic::new(params(2, 1, true));
        s.update(10.0, 0.0, 5.0);
        let v = s.update(10.0, 0.0, 7.5).value().unwrap();
        assert!((v.k - 75.0).abs() < 1e-12);
        // d_period 1 leaves %D equal to %K
        assert!((v.d - 75.0).abs() < 1e-12);
    }

    #[test]
    fn warmup_covers_period_and_d_period() {
        let mut s = Stochastic::new(params(2, 3, true));
        let bars = [
            (10.0, 8.0, 9.0),
            (11.0, 9.0, 10.0),
            (12.0, 10.0, 11.0),
            (13.0, 11.0, 12.0),
        ];
        let readings: Vec<_> = bars.iter().map(|&(h, l, c)| s.update(h, l, c)).collect();
        assert!(!readings[0].is_ready());
        assert!(!readings[1].is_ready());
        assert!(!readings[2].is_ready());
        assert!(readings[3].is_ready());
    }

    #[test]
    fn zero_range_safe_division_yields_safe_value() {
        let mut s = Stochastic::new(params(1, 1, true));
        let v = s.update(10.0, 10.0, 10.0).value().unwrap();
        assert!((v.k - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_range_without_safe_division_is_undefined() {
        let mut s = Stochastic::new(params(1, 1, false));
        assert_eq!(s.update(10.0, 10.0, 10.0), Reading::Undefined);
        // next bar with a range recovers
        assert!(s.update(12.0, 10.0, 11.0).is_ready());
    }

    #[test]
    fn d_is_ema_of_k() {
        let mut s = Stochastic::new(params(1, 3, true));
        let mut d = Ema::new(3);
        let bars = [
            (10.0, 0.0, 2.0),
            (10.0, 0.0, 4.0),
            (10.0, 0.0, 9.0),
            (10.0, 0.0, 1.0),
        ];
        for (h, l, c) in bars {
            let expected = d.update(100.0 * (c - l) / (h - l));
            let got = s.update(h, l, c).map(|v| v.d);
            assert_eq!(got.is_ready(), expected.is_ready());
            if let (Some(a), Some(b)) = (got.value(), expected.value()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn k_smoothing_delays_readiness() {
        let mut s = Stochastic::new(StochasticParams {
            period: 1,
            d_period: 1,
            k_smoothing: 3,
            safediv: true,
            safe_value: 50.0,
        });
        assert!(!s.update(10.0, 0.0, 5.0).is_ready());
        assert!(!s.update(10.0, 0.0, 5.0).is_ready());
        let v = s.update(10.0, 0.0, 5.0).value().unwrap();
        assert!((v.k - 50.0).abs() < 1e-12);
    }
}
