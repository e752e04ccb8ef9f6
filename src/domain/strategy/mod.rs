//! Per-bar strategy evaluation.
//!
//! A [`Strategy`] composes one [`SignalRule`] (indicator state plus a pure
//! decision rule) with one [`Tracker`] (position and pending order). Every
//! variant runs the same skeleton on each bar:
//!
//! 1. reject a bar that does not strictly follow the previous one
//! 2. update the indicators
//! 3. hold while an order is pending
//! 4. apply the variant's rule, gated by the tracker

pub mod params;
pub mod rules;
pub mod signal;

pub use params::{MacdParams, RsiParams, StrategyKind, StrategyParams};
pub use rules::Trigger;
pub use signal::SignalRule;

use chrono::NaiveDateTime;

use crate::domain::error::SigtraderError;
use crate::domain::events::{EventSink, StrategyEvent};
use crate::domain::indicator::Reading;
use crate::domain::ohlcv::Bar;
use crate::domain::order::{Fill, OrderSide, OrderStatus};
use crate::domain::tracker::{PositionState, Submission, Tracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl Decision {
    pub fn side(self) -> Option<OrderSide> {
        match self {
            Decision::Buy => Some(OrderSide::Buy),
            Decision::Sell => Some(OrderSide::Sell),
            Decision::Hold => None,
        }
    }
}

/// Read-only view of the broker account at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccountSnapshot {
    pub cash: f64,
    pub position_size: u64,
}

#[derive(Debug, Clone)]
pub struct Strategy {
    params: StrategyParams,
    rule: SignalRule,
    tracker: Tracker,
    last_timestamp: Option<NaiveDateTime>,
}

impl Strategy {
    pub fn new(params: StrategyParams) -> Self {
        Strategy {
            params,
            rule: SignalRule::new(&params),
            tracker: Tracker::new(),
            last_timestamp: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.params.kind().as_str()
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn position(&self) -> PositionState {
        self.tracker.position()
    }

    /// Evaluate one bar and return at most one order decision.
    ///
    /// A returned `Buy`/`Sell` has already been accepted by the tracker and
    /// must be forwarded to the broker.
    pub fn on_bar(
        &mut self,
        bar: &Bar,
        account: AccountSnapshot,
        sink: &mut dyn EventSink,
    ) -> Result<Decision, SigtraderError> {
        if let Some(previous) = self.last_timestamp.filter(|&p| bar.timestamp <= p) {
            return Err(SigtraderError::FeedIntegrity {
                previous,
                current: bar.timestamp,
            });
        }
        self.last_timestamp = Some(bar.timestamp);

        let trigger = self.rule.update(bar, &account);
        sink.emit(StrategyEvent::Close {
            timestamp: bar.timestamp,
            close: bar.close,
        });

        if self.tracker.has_pending() {
            return Ok(Decision::Hold);
        }

        let decision = match trigger {
            Reading::Ready(t) => t.decide(self.tracker.position()),
            Reading::NotReady | Reading::Undefined => Decision::Hold,
        };
        let Some(side) = decision.side() else {
            return Ok(Decision::Hold);
        };

        match self.tracker.submit_intent(side) {
            Submission::Accepted => {
                sink.emit(StrategyEvent::OrderCreated {
                    timestamp: bar.timestamp,
                    side,
                    close: bar.close,
                });
                Ok(decision)
            }
            reason => {
                sink.emit(StrategyEvent::OrderSkipped {
                    timestamp: bar.timestamp,
                    side,
                    reason,
                });
                Ok(Decision::Hold)
            }
        }
    }

    pub fn on_fill(&mut self, fill: Fill) {
        self.tracker.on_fill(fill);
    }

    pub fn on_rejected(&mut self, status: OrderStatus) {
        self.tracker.on_rejected(status);
    }
}
