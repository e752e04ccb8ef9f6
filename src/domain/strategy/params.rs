//! Strategy kinds and their immutable parameter sets.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{Smoothing, StochasticParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    BuyAndHold,
    Sma,
    Cma,
    Vwap,
    Bollinger,
    Turtle,
    MacdV1,
    MacdV2,
    KdjV1,
    KdjV2,
    Rsi,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 11] = [
        StrategyKind::BuyAndHold,
        StrategyKind::Sma,
        StrategyKind::Cma,
        StrategyKind::Vwap,
        StrategyKind::Bollinger,
        StrategyKind::Turtle,
        StrategyKind::MacdV1,
        StrategyKind::MacdV2,
        StrategyKind::KdjV1,
        StrategyKind::KdjV2,
        StrategyKind::Rsi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "buy_and_hold",
            StrategyKind::Sma => "sma",
            StrategyKind::Cma => "cma",
            StrategyKind::Vwap => "vwap",
            StrategyKind::Bollinger => "bollinger",
            StrategyKind::Turtle => "turtle",
            StrategyKind::MacdV1 => "macd_v1",
            StrategyKind::MacdV2 => "macd_v2",
            StrategyKind::KdjV1 => "kdj_v1",
            StrategyKind::KdjV2 => "kdj_v2",
            StrategyKind::Rsi => "rsi",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "buy on the first bar, never sell",
            StrategyKind::Sma => "buy close > SMA, sell close < SMA",
            StrategyKind::Cma => "buy/sell when close crosses the SMA with a two-bar trend",
            StrategyKind::Vwap => "buy above VWAP*(1+k), sell below VWAP*(1-k)",
            StrategyKind::Bollinger => "buy below the bottom band, sell above the top band",
            StrategyKind::Turtle => "buy above the prior n-bar high, sell below the prior n-bar low",
            StrategyKind::MacdV1 => "buy MACD line > 0, sell MACD line < 0",
            StrategyKind::MacdV2 => "buy MACD line > signal, sell MACD line < signal",
            StrategyKind::KdjV1 => "buy %K > 90, sell %K < 10",
            StrategyKind::KdjV2 => "buy %K crossing above %D, sell crossing below",
            StrategyKind::Rsi => "buy RSI > kbuy, sell RSI < ksell",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| SigtraderError::UnknownStrategy {
                kind: s.trim().to_string(),
            })
    }
}

pub const DEFAULT_MA_PERIOD: usize = 15;
pub const DEFAULT_VWAP_K: f64 = 0.01;
pub const DEFAULT_N_HIGH: usize = 30;
pub const DEFAULT_N_LOW: usize = 15;
pub const DEFAULT_KBUY: f64 = 80.0;
pub const DEFAULT_KSELL: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
        MacdParams {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    pub period: usize,
    pub kbuy: f64,
    pub ksell: f64,
    pub smoothing: Smoothing,
    pub safediv: bool,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            period: crate::domain::indicator::rsi::DEFAULT_PERIOD,
            kbuy: DEFAULT_KBUY,
            ksell: DEFAULT_KSELL,
            smoothing: Smoothing::Exponential,
            safediv: false,
        }
    }
}

/// Per-variant configuration. Fixed for the lifetime of a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyParams {
    BuyAndHold,
    Sma { period: usize },
    Cma { period: usize },
    Vwap { period: usize, k: f64 },
    Bollinger { period: usize, devfactor: f64 },
    Turtle { n_high: usize, n_low: usize },
    MacdV1(MacdParams),
    MacdV2(MacdParams),
    KdjV1(StochasticParams),
    KdjV2(StochasticParams),
    Rsi(RsiParams),
}

impl StrategyParams {
    pub fn defaults(kind: StrategyKind) -> Self {
        use crate::domain::indicator::bollinger;
        match kind {
            StrategyKind::BuyAndHold => StrategyParams::BuyAndHold,
            StrategyKind::Sma => StrategyParams::Sma {
                period: DEFAULT_MA_PERIOD,
            },
            StrategyKind::Cma => StrategyParams::Cma {
                period: DEFAULT_MA_PERIOD,
            },
            StrategyKind::Vwap => StrategyParams::Vwap {
                period: DEFAULT_MA_PERIOD,
                k: DEFAULT_VWAP_K,
            },
            StrategyKind::Bollinger => StrategyParams::Bollinger {
                period: bollinger::DEFAULT_PERIOD,
                devfactor: bollinger::DEFAULT_DEVFACTOR,
            },
            StrategyKind::Turtle => StrategyParams::Turtle {
                n_high: DEFAULT_N_HIGH,
                n_low: DEFAULT_N_LOW,
            },
            StrategyKind::MacdV1 => StrategyParams::MacdV1(MacdParams::default()),
            StrategyKind::MacdV2 => StrategyParams::MacdV2(MacdParams::default()),
            StrategyKind::KdjV1 => StrategyParams::KdjV1(StochasticParams::default()),
            StrategyKind::KdjV2 => StrategyParams::KdjV2(StochasticParams::default()),
            StrategyKind::Rsi => StrategyParams::Rsi(RsiParams::default()),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::BuyAndHold => StrategyKind::BuyAndHold,
            StrategyParams::Sma { .. } => StrategyKind::Sma,
            StrategyParams::Cma { .. } => StrategyKind::Cma,
            StrategyParams::Vwap { .. } => StrategyKind::Vwap,
            StrategyParams::Bollinger { .. } => StrategyKind::Bollinger,
            StrategyParams::Turtle { .. } => StrategyKind::Turtle,
            StrategyParams::MacdV1(_) => StrategyKind::MacdV1,
            StrategyParams::MacdV2(_) => StrategyKind::MacdV2,
            StrategyParams::KdjV1(_) => StrategyKind::KdjV1,
            StrategyParams::KdjV2(_) => StrategyKind::KdjV2,
            StrategyParams::Rsi(_) => StrategyKind::Rsi,
        }
    }
}

impl fmt::Display for StrategyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        match self {
            StrategyParams::BuyAndHold => Ok(()),
            StrategyParams::Sma { period } | StrategyParams::Cma { period } => {
                write!(f, "(period={period})")
            }
            StrategyParams::Vwap { period, k } => write!(f, "(period={period}, k={k})"),
            StrategyParams::Bollinger { period, devfactor } => {
                write!(f, "(period={period}, devfactor={devfactor})")
            }
            StrategyParams::Turtle { n_high, n_low } => {
                write!(f, "(n_high={n_high}, n_low={n_low})")
            }
            StrategyParams::MacdV1(m) | StrategyParams::MacdV2(m) => {
                write!(f, "(fast={}, slow={}, signal={})", m.fast, m.slow, m.signal)
            }
            StrategyParams::KdjV1(s) | StrategyParams::KdjV2(s) => write!(
                f,
                "(period={}, period_dfast={}, k_smoothing={}, safediv={}, safe_value={})",
                s.period, s.d_period, s.k_smoothing, s.safediv, s.safe_value
            ),
            StrategyParams::Rsi(r) => write!(
                f,
                "(period={}, kbuy={}, ksell={}, smoothing={}, safediv={})",
                r.period,
                r.kbuy,
                r.ksell,
                match r.smoothing {
                    Smoothing::Exponential => "ema",
                    Smoothing::Wilder => "wilder",
                },
                r.safediv
            ),
        }
    }
}
