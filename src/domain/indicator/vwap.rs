//! Rolling volume-weighted average price.
//!
//! VWAP(n) = sum(close * volume) / sum(volume) over the last n bars.
//! Not ready until the window is full and carries non-zero volume.

use super::Reading;
use crate::domain::window::RollingWindow;

#[derive(Debug, Clone)]
pub struct Vwap {
    window: RollingWindow<(f64, f64)>,
    last: Reading<f64>,
}

impl Vwap {
    pub fn new(period: usize) -> Self {
        Vwap {
            window: RollingWindow::new(period),
            last: Reading::NotReady,
        }
    }

    pub fn update(&mut self, price: f64, volume: f64) -> Reading<f64> {
        self.window.push((price * volume, volume));
        if !self.window.is_full() {
            self.last = Reading::NotReady;
            return self.last;
        }

        let (turnover, volume) = self
            .window
            .iter()
            .fold((0.0, 0.0), |(t, v), &(pt, pv)| (t + pt, v + pv));

        self.last = if volume > 0.0 {
            Reading::Ready(turnover / volume)
        } else {
            Reading::NotReady
        };
        self.last
    }

    pub fn current(&self) -> Reading<f64> {
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

    #[test]
    fn vwap_weights_by_volume() {
        let mut vwap = Vwap::new(2);
        assert_eq!(vwap.update(10.0, 100.0), Reading::NotReady);
        let v = vwap.update(20.0, 300.0).value().unwrap();
        // (1000 + 6000) / 400
        assert!((v - 17.5).abs() < 1e-12);
    }

    #[test]
    fn vwap_zero_volume_not_ready() {
        let mut vwap = Vwap::new(2);
        vwap.update(10.0, 0.0);
        assert_eq!(vwap.update(11.0, 0.0), Reading::NotReady);
        // volume arrives, window still holds one zero-volume bar
        let v = vwap.update(12.0, 50.0).value().unwrap();
        assert!((v - 12.0).abs() < 1e-12);
    }

    #[test]
    fn vwap_rolls_forward() {
        let mut vwap = Vwap::new(1);
        assert_eq!(vwap.update(10.0, 5.0), Reading::Ready(10.0));
        assert_eq!(vwap.update(12.0, 5.0), Reading::Ready(12.0));
    }
}
