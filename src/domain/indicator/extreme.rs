//! Highest-high / lowest-low over the last n inputs.
//!
//! Breakout rules compare today's close with the extreme of the window that
//! ended on the previous bar: read `current()` before calling `update()`.

use super::Reading;
use crate::domain::window::RollingWindow;

#[derive(Debug, Clone)]
pub struct Highest {
    window: RollingWindow<f64>,
}

impl Highest {
    pub fn new(period: usize) -> Self {
        Highest {
            window: RollingWindow::new(period),
        }
    }

    pub fn update(&mut self, high: f64) -> Reading<f64> {
        self.window.push(high);
        self.current()
    }

    pub fn current(&self) -> Reading<f64> {
        match (self.window.is_full(), self.window.max()) {
            (true, Some(v)) => Reading::Ready(v),
            _ => Reading::NotReady,
        }
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Lowest {
    window: RollingWindow<f64>,
}

impl Lowest {
    pub fn new(period: usize) -> Self {
        Lowest {
            window: RollingWindow::new(period),
        }
    }

    pub fn update(&mut self, low: f64) -> Reading<f64> {
        self.window.push(low);
        self.current()
    }

    pub fn current(&self) -> Reading<f64> {
        match (self.window.is_full(), self.window.min()) {
            (true, Some(v)) => Reading::Ready(v),
            _ => Reading::NotReady,
        }
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
