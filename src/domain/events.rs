//! Strategy lifecycle events and the sinks that consume them.
//!
//! The run loop and the strategies never print. Everything observable goes
//! through an [`EventSink`]: [`TracingSink`] for the CLI, [`RecordingSink`]
//! for tests and trace replay.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::order::{Fill, OrderSide, OrderStatus};
use super::tracker::Submission;

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyEvent {
    Started {
        strategy: String,
        value: f64,
    },
    Close {
        timestamp: NaiveDateTime,
        close: f64,
    },
    OrderCreated {
        timestamp: NaiveDateTime,
        side: OrderSide,
        close: f64,
    },
    /// The tracker refused an intent.
    OrderSkipped {
        timestamp: NaiveDateTime,
        side: OrderSide,
        reason: Submission,
    },
    Executed {
        timestamp: NaiveDateTime,
        fill: Fill,
        cash: f64,
    },
    OrderFailed {
        timestamp: NaiveDateTime,
        status: OrderStatus,
    },
    TradeClosed {
        timestamp: NaiveDateTime,
        gross: f64,
        net: f64,
    },
    Finished {
        strategy: String,
        value: f64,
    },
}

pub trait EventSink {
    fn emit(&mut self, event: StrategyEvent);
}

/// Logs events through `tracing`.
///
/// With `printlog` off, per-bar chatter drops to `debug`; failures stay at
/// `warn` and the start/finish banners stay at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    printlog: bool,
}

impl TracingSink {
    pub fn new(printlog: bool) -> Self {
        TracingSink { printlog }
    }
}

macro_rules! bar_log {
    ($printlog:expr, $($arg:tt)+) => {
        if $printlog {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

impl EventSink for TracingSink {
    fn emit(&mut self, event: StrategyEvent) {
        match event {
            StrategyEvent::Started { strategy, value } => {
                info!(strategy = %strategy, value, "=== Backtesting Start! ===");
            }
            StrategyEvent::Close { timestamp, close } => {
                bar_log!(self.printlog, date = %timestamp.date(), "Close, {close:.2}");
            }
            StrategyEvent::OrderCreated {
                timestamp,
                side,
                close,
            } => {
                bar_log!(self.printlog, date = %timestamp.date(), "{side} CREATE, {close:.2}");
            }
            StrategyEvent::OrderSkipped {
                timestamp,
                side,
                reason,
            } => {
                debug!(date = %timestamp.date(), side = %side, reason = ?reason, "Order intent skipped");
            }
            StrategyEvent::Executed {
                timestamp,
                fill,
                cash,
            } => {
                bar_log!(
                    self.printlog,
                    date = %timestamp.date(),
                    "{} EXECUTED, Price: {:.2}, Size: {}, Cost: {:.2}, Comm {:.2}, Cash {:.2}",
                    fill.side,
                    fill.price,
                    fill.size,
                    fill.value,
                    fill.commission,
                    cash
                );
            }
            StrategyEvent::OrderFailed { timestamp, status } => {
                warn!(date = %timestamp.date(), status = %status, "Order Canceled/Margin/Rejected");
            }
            StrategyEvent::TradeClosed {
                timestamp,
                gross,
                net,
            } => {
                bar_log!(
                    self.printlog,
                    date = %timestamp.date(),
                    "OPERATION PROFIT, GROSS {gross:.2}, NET {net:.2}"
                );
            }
            StrategyEvent::Finished { strategy, value } => {
                info!(strategy = %strategy, value, "=== Backtesting Finished! ===");
            }
        }
    }
}

/// Keeps every event in order of emission.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<StrategyEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders_created(&self) -> Vec<(NaiveDateTime, OrderSide)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StrategyEvent::OrderCreated {
                    timestamp, side, ..
                } => Some((*timestamp, *side)),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, StrategyEvent::OrderFailed { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: StrategyEvent) {
        self.events.push(event);
    }
}
