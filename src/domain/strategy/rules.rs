//! Pure entry/exit conditions for every strategy variant.
//!
//! Each function maps indicator values for one bar to a [`Trigger`]; the
//! position decides which half of it matters. All comparisons are strict.

use super::Decision;
use crate::domain::indicator::{BollingerBands, Cross, MacdValue};
use crate::domain::tracker::PositionState;

/// Entry and exit conditions evaluated on the same bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trigger {
    pub enter: bool,
    pub exit: bool,
}

impl Trigger {
    pub fn new(enter: bool, exit: bool) -> Self {
        Trigger { enter, exit }
    }

    /// Buy only when flat, sell only when long.
    pub fn decide(self, position: PositionState) -> Decision {
        match position {
            PositionState::Flat if self.enter => Decision::Buy,
            PositionState::Long if self.exit => Decision::Sell,
            _ => Decision::Hold,
        }
    }
}

pub fn buy_and_hold() -> Trigger {
    Trigger::new(true, false)
}

pub fn sma(close: f64, average: f64) -> Trigger {
    Trigger::new(close > average, close < average)
}

/// Close crossing the moving average, confirmed by the close two bars ago.
pub fn cma(close: f64, average: f64, close_lag2: f64, average_lag2: f64) -> Trigger {
    Trigger::new(
        close > average && close_lag2 < average_lag2 && close > close_lag2,
        close < average && close_lag2 > average_lag2 && close < close_lag2,
    )
}

/// `stock_value` is position size times close; `cash` is the broker's free cash.
pub fn vwap_band(close: f64, vwap: f64, k: f64, stock_value: f64, cash: f64) -> Trigger {
    if vwap <= 0.0 {
        return Trigger::default();
    }
    Trigger::new(
        close > vwap * (1.0 + k) && stock_value < cash * 0.9,
        close < vwap * (1.0 - k) && stock_value > 0.0,
    )
}

/// Mean reversion: buy the lower band, sell the upper band.
pub fn bollinger(close: f64, bands: BollingerBands) -> Trigger {
    Trigger::new(close < bands.bottom, close > bands.top)
}

/// Breakout against the extremes of the window ending on the previous bar.
pub fn turtle(close: f64, prior_high: f64, prior_low: f64) -> Trigger {
    Trigger::new(close > prior_high, close < prior_low)
}

pub fn macd_zero_line(macd: MacdValue) -> Trigger {
    Trigger::new(macd.line > 0.0, macd.line < 0.0)
}

pub fn macd_signal_line(macd: MacdValue) -> Trigger {
    Trigger::new(macd.line > macd.signal, macd.line < macd.signal)
}

pub const KDJ_OVERBOUGHT: f64 = 90.0;
pub const KDJ_OVERSOLD: f64 = 10.0;

pub fn kdj_level(k: f64) -> Trigger {
    Trigger::new(k > KDJ_OVERBOUGHT, k < KDJ_OVERSOLD)
}

pub fn kdj_cross(cross: Cross) -> Trigger {
    Trigger::new(cross == Cross::Up, cross == Cross::Down)
}

pub fn rsi(value: f64, kbuy: f64, ksell: f64) -> Trigger {
    Trigger::new(value > kbuy, value < ksell)
}
