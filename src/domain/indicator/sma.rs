//! Simple moving average over the last n closes.

use super::Reading;
use crate::domain::window::RollingWindow;

#[derive(Debug, Clone)]
pub struct Sma {
    window: RollingWindow<f64>,
    last: Reading<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Sma {
            window: RollingWindow::new(period),
            last: Reading::NotReady,
        }
    }

    pub fn update(&mut self, close: f64) -> Reading<f64> {
        self.window.push(close);
        self.last = if self.window.is_full() {
            Reading::Ready(self.window.sum() / self.window.capacity() as f64)
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
    fn sma_not_ready_until_full() {
        let mut sma = Sma::new(4);
        for close in [10.0, 10.0, 10.0] {
            assert_eq!(sma.update(close), Reading::NotReady);
        }
        assert_eq!(sma.update(10.0), Reading::Ready(10.0));
    }

    #[test]
    fn sma_rolls_forward() {
        let mut sma = Sma::new(4);
        for close in [10.0, 10.0, 10.0, 10.0] {
            sma.update(close);
        }
        assert_eq!(sma.update(20.0), Reading::Ready(12.5));
        assert_eq!(sma.current(), Reading::Ready(12.5));
    }

    #[test]
    fn sma_reset() {
        let mut sma = Sma::new(2);
        sma.update(1.0);
        sma.update(2.0);
        sma.reset();
        assert_eq!(sma.current(), Reading::NotReady);
        assert_eq!(sma.update(3.0), Reading::NotReady);
    }
}
