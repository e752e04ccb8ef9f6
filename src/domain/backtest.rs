//! Run loop driving one strategy against one broker over an ordered feed.
//!
//! Per bar:
//! 1. the broker resolves queued orders against the bar; every notification
//!    is relayed into the strategy's tracker before evaluation
//! 2. the strategy evaluates the bar with a snapshot of the account
//! 3. an accepted intent is forwarded to the broker
//!
//! Each step is recorded so a run can be replayed bar for bar.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

use super::error::SigtraderError;
use super::events::{EventSink, StrategyEvent};
use super::ohlcv::Bar;
use super::order::{Notification, OrderId, OrderSide};
use super::strategy::{AccountSnapshot, Decision, Strategy};
use crate::ports::broker_port::BrokerPort;

/// Backtest parameters from the `[backtest]` config section.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub data_path: PathBuf,
    pub reverse: bool,
    /// Rescale prices by the feed's `Adj Close` column when it has one.
    pub adjclose: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_cash: f64,
    /// Share of free cash committed per buy, in percent.
    pub sizer_percent: f64,
    /// Fraction of traded value charged per fill.
    pub commission: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            data_path: PathBuf::new(),
            reverse: false,
            adjclose: true,
            start_date: None,
            end_date: None,
            initial_cash: 10_000.0,
            sizer_percent: 90.0,
            commission: 0.0,
        }
    }
}

/// Everything that happened on one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRecord {
    pub timestamp: NaiveDateTime,
    pub notifications: Vec<Notification>,
    pub account: AccountSnapshot,
    pub decision: Decision,
    pub order: Option<OrderId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub timestamp: NaiveDateTime,
    pub gross: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub strategy: String,
    pub start_value: f64,
    pub final_value: f64,
    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
    pub records: Vec<BarRecord>,
}

impl RunReport {
    pub fn total_return(&self) -> f64 {
        if self.start_value == 0.0 {
            return 0.0;
        }
        self.final_value / self.start_value - 1.0
    }

    /// Bars on which an order was sent to the broker.
    pub fn orders(&self) -> impl Iterator<Item = (NaiveDateTime, Decision)> + '_ {
        self.records
            .iter()
            .filter(|r| r.order.is_some())
            .map(|r| (r.timestamp, r.decision))
    }

    pub fn completed_fills(&self) -> usize {
        self.records
            .iter()
            .flat_map(|r| &r.notifications)
            .filter(|n| matches!(n, Notification::Completed { .. }))
            .count()
    }

    /// Largest peak-to-trough equity decline as a fraction of the peak.
    pub fn max_drawdown(&self) -> f64 {
        let mut peak = f64::MIN;
        let mut worst: f64 = 0.0;
        for point in &self.equity_curve {
            peak = peak.max(point.equity);
            if peak > 0.0 {
                worst = worst.max((peak - point.equity) / peak);
            }
        }
        worst
    }
}

fn relay(
    notification: &Notification,
    timestamp: NaiveDateTime,
    strategy: &mut Strategy,
    broker: &dyn BrokerPort,
    sink: &mut dyn EventSink,
    trades: &mut Vec<ClosedTrade>,
) {
    match notification {
        Notification::Completed { fill, .. } => {
            strategy.on_fill(*fill);
            sink.emit(StrategyEvent::Executed {
                timestamp,
                fill: *fill,
                cash: broker.cash(),
            });
        }
        Notification::Failed { status, .. } => {
            strategy.on_rejected(*status);
            sink.emit(StrategyEvent::OrderFailed {
                timestamp,
                status: *status,
            });
        }
        Notification::TradeClosed { gross, net } => {
            trades.push(ClosedTrade {
                timestamp,
                gross: *gross,
                net: *net,
            });
            sink.emit(StrategyEvent::TradeClosed {
                timestamp,
                gross: *gross,
                net: *net,
            });
        }
    }
}

pub fn run(
    bars: &[Bar],
    strategy: &mut Strategy,
    broker: &mut dyn BrokerPort,
    sink: &mut dyn EventSink,
) -> Result<RunReport, SigtraderError> {
    let start_value = broker.cash();
    sink.emit(StrategyEvent::Started {
        strategy: strategy.name().to_string(),
        value: start_value,
    });

    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut records = Vec::with_capacity(bars.len());

    for bar in bars {
        let notifications = broker.process_bar(bar);
        for n in &notifications {
            relay(n, bar.timestamp, strategy, broker, sink, &mut trades);
        }

        let account = AccountSnapshot {
            cash: broker.cash(),
            position_size: broker.position_size(),
        };
        let decision = strategy.on_bar(bar, account, sink)?;
        let order = match decision {
            Decision::Buy => Some(broker.submit(OrderSide::Buy, bar)),
            Decision::Sell => Some(broker.submit(OrderSide::Sell, bar)),
            Decision::Hold => None,
        };

        equity_curve.push(EquityPoint {
            timestamp: bar.timestamp,
            equity: broker.value(bar.close),
        });
        records.push(BarRecord {
            timestamp: bar.timestamp,
            notifications,
            account,
            decision,
            order,
        });
    }

    let final_value = bars
        .last()
        .map(|b| broker.value(b.close))
        .unwrap_or(start_value);
    sink.emit(StrategyEvent::Finished {
        strategy: strategy.name().to_string(),
        value: final_value,
    });

    Ok(RunReport {
        strategy: strategy.name().to_string(),
        start_value,
        final_value,
        trades,
        equity_curve,
        records,
    })
}
