//! Indicator state owned by each strategy variant.
//!
//! `SignalRule::update` feeds one bar into every indicator the variant uses
//! and hands the readings to the matching pure rule. Indicators are updated
//! on every bar, so their history never skips one while an order is pending.

use super::params::StrategyParams;
use super::rules::{self, Trigger};
use super::AccountSnapshot;
use crate::domain::indicator::{
    Bollinger, CrossOver, Highest, Lowest, Macd, Reading, Rsi, Sma, Stochastic, Vwap,
};
use crate::domain::ohlcv::Bar;
use crate::domain::window::RollingWindow;

#[derive(Debug, Clone)]
pub enum SignalRule {
    BuyAndHold,
    Sma {
        sma: Sma,
    },
    Cma {
        sma: Sma,
        closes: RollingWindow<f64>,
        averages: RollingWindow<Reading<f64>>,
    },
    Vwap {
        vwap: Vwap,
        k: f64,
    },
    Bollinger {
        bands: Bollinger,
    },
    Turtle {
        highest: Highest,
        lowest: Lowest,
    },
    Macd {
        macd: Macd,
        against_signal: bool,
    },
    Kdj {
        stochastic: Stochastic,
        cross: Option<CrossOver>,
    },
    Rsi {
        rsi: Rsi,
        kbuy: f64,
        ksell: f64,
    },
}

impl SignalRule {
    pub fn new(params: &StrategyParams) -> Self {
        match *params {
            StrategyParams::BuyAndHold => SignalRule::BuyAndHold,
            StrategyParams::Sma { period } => SignalRule::Sma {
                sma: Sma::new(period),
            },
            StrategyParams::Cma { period } => SignalRule::Cma {
                sma: Sma::new(period),
                closes: RollingWindow::new(3),
                averages: RollingWindow::new(3),
            },
            StrategyParams::Vwap { period, k } => SignalRule::Vwap {
                vwap: Vwap::new(period),
                k,
            },
            StrategyParams::Bollinger { period, devfactor } => SignalRule::Bollinger {
                bands: Bollinger::new(period, devfactor),
            },
            StrategyParams::Turtle { n_high, n_low } => SignalRule::Turtle {
                highest: Highest::new(n_high),
                lowest: Lowest::new(n_low),
            },
            StrategyParams::MacdV1(m) => SignalRule::Macd {
                macd: Macd::new(m.fast, m.slow, m.signal),
                against_signal: false,
            },
            StrategyParams::MacdV2(m) => SignalRule::Macd {
                macd: Macd::new(m.fast, m.slow, m.signal),
                against_signal: true,
            },
            StrategyParams::KdjV1(s) => SignalRule::Kdj {
                stochastic: Stochastic::new(s),
                cross: None,
            },
            StrategyParams::KdjV2(s) => SignalRule::Kdj {
                stochastic: Stochastic::new(s),
                cross: Some(CrossOver::new()),
            },
            StrategyParams::Rsi(r) => SignalRule::Rsi {
                rsi: Rsi::new(r.period, r.smoothing, r.safediv),
                kbuy: r.kbuy,
                ksell: r.ksell,
            },
        }
    }

    /// Consume one bar. Anything short of a ready reading yields no trigger.
    pub fn update(&mut self, bar: &Bar, account: &AccountSnapshot) -> Reading<Trigger> {
        match self {
            SignalRule::BuyAndHold => Reading::Ready(rules::buy_and_hold()),
            SignalRule::Sma { sma } => sma.update(bar.close).map(|avg| rules::sma(bar.close, avg)),
            SignalRule::Cma {
                sma,
                closes,
                averages,
            } => {
                closes.push(bar.close);
                averages.push(sma.update(bar.close));
                let lagged = averages.latest().zip(averages.lagged(2));
                match (lagged, closes.lagged(2)) {
                    (Some((now, then)), Some(close_lag2)) => now
                        .zip(then)
                        .map(|(avg, avg_lag2)| rules::cma(bar.close, avg, close_lag2, avg_lag2)),
                    _ => Reading::NotReady,
                }
            }
            SignalRule::Vwap { vwap, k } => {
                let k = *k;
                let stock_value = account.position_size as f64 * bar.close;
                vwap.update(bar.close, bar.volume)
                    .map(|v| rules::vwap_band(bar.close, v, k, stock_value, account.cash))
            }
            SignalRule::Bollinger { bands } => bands
                .update(bar.close)
                .map(|b| rules::bollinger(bar.close, b)),
            SignalRule::Turtle { highest, lowest } => {
                let prior = highest.current().zip(lowest.current());
                highest.update(bar.high);
                lowest.update(bar.low);
                prior.map(|(hh, ll)| rules::turtle(bar.close, hh, ll))
            }
            SignalRule::Macd {
                macd,
                against_signal,
            } => {
                let against_signal = *against_signal;
                macd.update(bar.close).map(|v| {
                    if against_signal {
                        rules::macd_signal_line(v)
                    } else {
                        rules::macd_zero_line(v)
                    }
                })
            }
            SignalRule::Kdj { stochastic, cross } => {
                let reading = stochastic.update(bar.high, bar.low, bar.close);
                match cross {
                    None => reading.map(|v| rules::kdj_level(v.k)),
                    Some(cross) => match reading {
                        Reading::Ready(v) => cross.update(v.k, v.d).map(rules::kdj_cross),
                        other => {
                            cross.reset();
                            other.map(|_| Trigger::default())
                        }
                    },
                }
            }
            SignalRule::Rsi { rsi, kbuy, ksell } => {
                let (kbuy, ksell) = (*kbuy, *ksell);
                rsi.update(bar.close).map(|v| rules::rsi(v, kbuy, ksell))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::params::{MacdParams, RsiParams};
    use crate::domain::indicator::StochasticParams;
    use chrono::NaiveDate;

    fn bar(day: u32, high: f64, low: f64, close: f64) -> Bar {
        Bar::daily(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            high,
            low,
            close,
            1_000.0,
        )
    }

    fn flat() -> AccountSnapshot {
        AccountSnapshot {
            cash: 10_000.0,
            position_size: 0,
        }
    }

    fn triggers(rule: &mut SignalRule, bars: &[Bar]) -> Vec<Reading<Trigger>> {
        bars.iter().map(|b| rule.update(b, &flat())).collect()
    }

    #[test]
    fn sma_not_ready_before_window_full() {
        let mut rule = SignalRule::new(&StrategyParams::Sma { period: 4 });
        let bars: Vec<Bar> = [10.0, 10.0, 10.0, 10.0, 20.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i as u32 + 1, c, c, c))
            .collect();
        let out = triggers(&mut rule, &bars);
        assert!(out[..3].iter().all(|r| !r.is_ready()));
        // 10 vs 10: neither strict condition
        assert_eq!(out[3], Reading::Ready(Trigger::new(false, false)));
        // SMA 12.5, close 20
        assert_eq!(out[4], Reading::Ready(Trigger::new(true, false)));
    }

    #[test]
    fn turtle_uses_previous_window() {
        let mut rule = SignalRule::new(&StrategyParams::Turtle {
            n_high: 3,
            n_low: 3,
        });
        let highs = [5.0, 6.0, 7.0, 8.0];
        let bars: Vec<Bar> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| bar(i as u32 + 1, h, h - 1.0, h - 0.5))
            .collect();
        let out = triggers(&mut rule, &bars);
        assert!(out[..3].iter().all(|r| !r.is_ready()));
        assert!(out[3].is_ready());

        // prior window highs 6, 7, 8
        let mut breakout = rule.clone();
        let t = breakout.update(&bar(5, 9.0, 8.0, 9.0), &flat());
        assert_eq!(t.map(|t| t.enter), Reading::Ready(true));

        let t = rule.update(&bar(5, 9.0, 6.5, 7.0), &flat());
        assert_eq!(t.map(|t| t.enter), Reading::Ready(false));
    }

    #[test]
    fn cma_waits_for_lagged_average() {
        let mut rule = SignalRule::new(&StrategyParams::Cma { period: 2 });
        let closes = [10.0, 10.0, 9.0, 8.0, 12.0];
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i as u32 + 1, c, c, c))
            .collect();
        let out = triggers(&mut rule, &bars);
        // average first ready on bar 2, lag-2 average on bar 4
        assert!(out[..3].iter().all(|r| !r.is_ready()));
        assert!(out[3].is_ready());
        // bar 5: close 12 > avg 10, two bars back close 9 < avg 9.5, 12 > 9
        assert_eq!(out[4].map(|t| t.enter), Reading::Ready(true));
    }

    #[test]
    fn vwap_sees_account_value() {
        let mut rule = SignalRule::new(&StrategyParams::Vwap { period: 1, k: 0.0 });
        let b = bar(1, 10.0, 10.0, 10.0);
        let holding = AccountSnapshot {
            cash: 0.0,
            position_size: 10,
        };
        // close == vwap with k = 0: neither condition is strict
        assert_eq!(
            rule.update(&b, &holding),
            Reading::Ready(Trigger::new(false, false))
        );
    }

    #[test]
    fn macd_variants_share_indicator() {
        let params = MacdParams {
            fast: 2,
            slow: 3,
            signal: 2,
        };
        let mut v1 = SignalRule::new(&StrategyParams::MacdV1(params));
        let mut v2 = SignalRule::new(&StrategyParams::MacdV2(params));
        let bars: Vec<Bar> = (1..=8)
            .map(|d| {
                let c = 10.0 + d as f64;
                bar(d, c, c, c)
            })
            .collect();
        let a = triggers(&mut v1, &bars);
        let b = triggers(&mut v2, &bars);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.is_ready(), y.is_ready());
        }
        assert_eq!(a[7].map(|t| t.enter), Reading::Ready(true));
    }

    #[test]
    fn kdj_cross_resets_on_undefined() {
        let mut rule = SignalRule::new(&StrategyParams::KdjV2(StochasticParams {
            period: 1,
            d_period: 1,
            k_smoothing: 1,
            safediv: false,
            safe_value: 50.0,
        }));
        let first = rule.update(&bar(1, 10.0, 0.0, 5.0), &flat());
        assert!(!first.is_ready());
        let undefined = rule.update(&bar(2, 10.0, 10.0, 10.0), &flat());
        assert_eq!(undefined, Reading::Undefined);
        // history was dropped, so the next bar has no prior pair
        assert!(!rule.update(&bar(3, 10.0, 0.0, 5.0), &flat()).is_ready());
    }

    #[test]
    fn rsi_rule_uses_thresholds() {
        let mut rule = SignalRule::new(&StrategyParams::Rsi(RsiParams {
            period: 2,
            safediv: true,
            ..RsiParams::default()
        }));
        let closes = [10.0, 11.0, 12.0];
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i as u32 + 1, c, c, c))
            .collect();
        let out = triggers(&mut rule, &bars);
        // all gains, clamped to 100 > 80
        assert_eq!(out[2].map(|t| t.enter), Reading::Ready(true));
    }
}
