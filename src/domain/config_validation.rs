//! Configuration validation.
//!
//! Runs before any data is loaded. `[backtest]` values are checked straight
//! from the config; strategy parameters are checked once assembled.

use crate::domain::error::SigtraderError;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_initial_cash(config)?;
    validate_sizer_percent(config)?;
    validate_commission(config)?;
    validate_dates(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "initial_cash", 10_000.0);
    if value < 0.0 {
        return Err(SigtraderError::invalid(
            "backtest",
            "initial_cash",
            "initial_cash must be non-negative",
        ));
    }
    Ok(())
}

fn validate_sizer_percent(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "sizer_percent", 90.0);
    if value <= 0.0 || value > 100.0 {
        return Err(SigtraderError::invalid(
            "backtest",
            "sizer_percent",
            "sizer_percent must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "commission", 0.0);
    if value < 0.0 {
        return Err(SigtraderError::invalid(
            "backtest",
            "commission",
            "commission must be non-negative",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let start_date = parse_optional_date(config, "start_date")?;
    let end_date = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(SigtraderError::invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

/// Absent or blank is `None`; anything else must be `YYYY-MM-DD`.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, SigtraderError> {
    match config.get_string("backtest", key) {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                SigtraderError::invalid(
                    "backtest",
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
        _ => Ok(None),
    }
}

fn positive(key: &str, value: usize) -> Result<(), SigtraderError> {
    if value == 0 {
        return Err(SigtraderError::invalid(
            "strategy",
            key,
            format!("{} must be positive", key),
        ));
    }
    Ok(())
}

pub fn validate_strategy_params(params: &StrategyParams) -> Result<(), SigtraderError> {
    match params {
        StrategyParams::BuyAndHold => Ok(()),
        StrategyParams::Sma { period } | StrategyParams::Cma { period } => {
            positive("period", *period)
        }
        StrategyParams::Vwap { period, k } => {
            positive("period", *period)?;
            if *k < 0.0 {
                return Err(SigtraderError::invalid("strategy", "k", "k must be non-negative"));
            }
            Ok(())
        }
        StrategyParams::Bollinger { period, devfactor } => {
            positive("period", *period)?;
            if *devfactor <= 0.0 {
                return Err(SigtraderError::invalid(
                    "strategy",
                    "devfactor",
                    "devfactor must be positive",
                ));
            }
            Ok(())
        }
        StrategyParams::Turtle { n_high, n_low } => {
            positive("n_high", *n_high)?;
            positive("n_low", *n_low)
        }
        StrategyParams::MacdV1(m) | StrategyParams::MacdV2(m) => {
            positive("fast_period", m.fast)?;
            positive("slow_period", m.slow)?;
            positive("signal_period", m.signal)?;
            if m.fast >= m.slow {
                return Err(SigtraderError::invalid(
                    "strategy",
                    "fast_period",
                    "fast_period must be less than slow_period",
                ));
            }
            Ok(())
        }
        StrategyParams::KdjV1(s) | StrategyParams::KdjV2(s) => {
            positive("k_period", s.period)?;
            positive("period_dfast", s.d_period)?;
            positive("k_smoothing", s.k_smoothing)?;
            if !(0.0..=100.0).contains(&s.safe_value) {
                return Err(SigtraderError::invalid(
                    "strategy",
                    "safe_value",
                    "safe_value must be between 0 and 100",
                ));
            }
            Ok(())
        }
        StrategyParams::Rsi(r) => {
            positive("period", r.period)?;
            if r.kbuy <= r.ksell {
                return Err(SigtraderError::invalid(
                    "strategy",
                    "kbuy",
                    "kbuy must be greater than ksell",
                ));
            }
            Ok(())
        }
    }
}
