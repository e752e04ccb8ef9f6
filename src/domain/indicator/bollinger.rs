//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Top: Middle + (devfactor × StdDev)
//! - Bottom: Middle - (devfactor × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1)
//! over the same window as the SMA.
//!
//! Default parameters: period=20, devfactor=2.0
//! Warmup: first (period-1) bars are not ready.

use super::Reading;
use crate::domain::window::RollingWindow;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_DEVFACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub top: f64,
    pub middle: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: RollingWindow<f64>,
    devfactor: f64,
    last: Reading<BollingerBands>,
}

impl Bollinger {
    pub fn new(period: usize, devfactor: f64) -> Self {
        Bollinger {
            window: RollingWindow::new(period),
            devfactor,
            last: Reading::NotReady,
        }
    }

    pub fn update(&mut self, close: f64) -> Reading<BollingerBands> {
        self.window.push(close);
        if !self.window.is_full() {
            self.last = Reading::NotReady;
            return self.last;
        }

        let n = self.window.capacity() as f64;
        let middle = self.window.sum() / n;
        let variance = self
            .window
            .iter()
            .map(|c| {
                let diff = c - middle;
                diff * diff
            })
            .sum::<f64>()
            / n;
        let stddev = variance.sqrt();

        self.last = Reading::Ready(BollingerBands {
            top: middle + self.devfactor * stddev,
            middle,
            bottom: middle - self.devfactor * stddev,
        });
        self.last
    }

    pub fn current(&self) -> Reading<BollingerBands> {
        self.last
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.last = Reading::NotReady;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(b: &mut Bollinger, closes: &[f64]) -> Reading<BollingerBands> {
        let mut last = Reading::NotReady;
        for &c in closes {
            last = b.update(c);
        }
        last
    }

    #[test]
    fn bollinger_warmup() {
        let mut b = Bollinger::new(3, 2.0);
        assert_eq!(b.update(10.0), Reading::NotReady);
        assert_eq!(b.update(20.0), Reading::NotReady);
        assert!(b.update(30.0).is_ready());
    }

    #[test]
    fn bollinger_constant_values() {
        let mut b = Bollinger::new(3, 2.0);
        let bands = feed(&mut b, &[100.0, 100.0, 100.0]).value().unwrap();
        assert!((bands.middle - 100.0).abs() < f64::EPSILON);
        assert!((bands.top - 100.0).abs() < f64::EPSILON);
        assert!((bands.bottom - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let mut b = Bollinger::new(3, 2.0);
        let bands = feed(&mut b, &[10.0, 20.0, 30.0]).value().unwrap();

        let expected_middle: f64 = 20.0;
        let variance: f64 = (100.0 + 0.0 + 100.0) / 3.0;
        let stddev = variance.sqrt();

        assert!((bands.middle - expected_middle).abs() < 1e-10);
        assert!((bands.top - (expected_middle + 2.0 * stddev)).abs() < 1e-10);
        assert!((bands.bottom - (expected_middle - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_devfactor_variations() {
        let mut b = Bollinger::new(3, 1.0);
        let bands = feed(&mut b, &[10.0, 20.0, 30.0]).value().unwrap();
        let stddev = (200.0_f64 / 3.0).sqrt();
        assert!((bands.top - (20.0 + stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let mut b = Bollinger::new(4, 2.0);
        let bands = feed(&mut b, &[3.0, 9.0, 4.0, 11.0]).value().unwrap();
        let upper_dist = bands.top - bands.middle;
        let lower_dist = bands.middle - bands.bottom;
        assert!((upper_dist - lower_dist).abs() < 1e-10);
    }

    #[test]
    fn bollinger_window_slides() {
        let mut b = Bollinger::new(2, 2.0);
        let bands = feed(&mut b, &[1.0, 5.0, 5.0]).value().unwrap();
        assert!((bands.middle - 5.0).abs() < f64::EPSILON);
        assert!((bands.top - bands.bottom).abs() < f64::EPSILON);
    }
}
