//! Position and pending-order bookkeeping for a single strategy.
//!
//! At most one order is in flight at a time. The position only changes on a
//! confirmed fill, never on submission.

use super::order::{Fill, OrderSide, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long,
}

/// Outcome of asking the tracker to place an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    /// An earlier order has not resolved yet.
    Pending,
    /// Buy while long or sell while flat.
    WrongPosition,
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    position: PositionState,
    pending: Option<OrderSide>,
    last_fill: Option<Fill>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_intent(&mut self, side: OrderSide) -> Submission {
        if self.pending.is_some() {
            return Submission::Pending;
        }
        match (side, self.position) {
            (OrderSide::Buy, PositionState::Flat) | (OrderSide::Sell, PositionState::Long) => {
                self.pending = Some(side);
                Submission::Accepted
            }
            _ => Submission::WrongPosition,
        }
    }

    pub fn on_fill(&mut self, fill: Fill) {
        self.position = match fill.side {
            OrderSide::Buy => PositionState::Long,
            OrderSide::Sell => PositionState::Flat,
        };
        self.pending = None;
        self.last_fill = Some(fill);
    }

    /// Canceled, margin or rejected: the order is gone and is not retried.
    pub fn on_rejected(&mut self, _status: OrderStatus) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_side(&self) -> Option<OrderSide> {
        self.pending
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    pub fn last_fill(&self) -> Option<&Fill> {
        self.last_fill.as_ref()
    }
}
