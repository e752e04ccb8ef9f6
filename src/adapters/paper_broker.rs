//! Simulated broker for backtests.
//!
//! Market orders are sized when submitted (whole shares of a percentage of
//! free cash at the submitting bar's close) and filled at the next bar's
//! open. A sell always closes the whole position.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::ohlcv::Bar;
use crate::domain::order::{Fill, Notification, OrderId, OrderSide, OrderStatus};
use crate::ports::broker_port::BrokerPort;

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueuedOrder {
    id: OrderId,
    side: OrderSide,
    size: u64,
}

/// Cost basis of the open position, kept for trade P&L.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct OpenTrade {
    price: f64,
    commission: f64,
}

#[derive(Debug, Clone)]
pub struct PaperBroker {
    cash: f64,
    position: u64,
    open_trade: Option<OpenTrade>,
    queued: VecDeque<QueuedOrder>,
    next_id: u64,
    sizer_percent: f64,
    commission_rate: f64,
}

impl PaperBroker {
    pub fn new(initial_cash: f64, sizer_percent: f64, commission_rate: f64) -> Self {
        debug!(
            cash = initial_cash,
            sizer_percent, commission_rate, "PaperBroker initialized"
        );
        PaperBroker {
            cash: initial_cash,
            position: 0,
            open_trade: None,
            queued: VecDeque::new(),
            next_id: 0,
            sizer_percent,
            commission_rate,
        }
    }

    /// Value * rate.
    pub fn commission(&self, value: f64) -> f64 {
        value * self.commission_rate
    }

    /// Whole shares affordable with `sizer_percent` of free cash at `price`.
    pub fn order_size(&self, price: f64) -> u64 {
        if price <= 0.0 {
            return 0;
        }
        let budget = self.cash * self.sizer_percent / 100.0;
        (budget / price).floor().max(0.0) as u64
    }

    fn fill_buy(&mut self, order: QueuedOrder, price: f64) -> Notification {
        let value = order.size as f64 * price;
        let commission = self.commission(value);
        if order.size == 0 || value + commission > self.cash {
            debug!(id = %order.id, size = order.size, price, cash = self.cash, "Buy exceeds cash");
            return Notification::Failed {
                id: order.id,
                status: OrderStatus::Margin,
            };
        }

        self.cash -= value + commission;
        self.position += order.size;
        self.open_trade = Some(OpenTrade { price, commission });
        Notification::Completed {
            id: order.id,
            fill: Fill::new(OrderSide::Buy, price, order.size, commission),
        }
    }

    fn fill_sell(&mut self, order: QueuedOrder, price: f64, out: &mut Vec<Notification>) {
        let size = self.position;
        let Some(entry) = self.open_trade.filter(|_| size > 0) else {
            out.push(Notification::Failed {
                id: order.id,
                status: OrderStatus::Rejected,
            });
            return;
        };

        let value = size as f64 * price;
        let commission = self.commission(value);
        self.cash += value - commission;
        self.position = 0;
        self.open_trade = None;

        let gross = (price - entry.price) * size as f64;
        out.push(Notification::Completed {
            id: order.id,
            fill: Fill::new(OrderSide::Sell, price, size, commission),
        });
        out.push(Notification::TradeClosed {
            gross,
            net: gross - entry.commission - commission,
        });
    }
}

impl BrokerPort for PaperBroker {
    fn submit(&mut self, side: OrderSide, bar: &Bar) -> OrderId {
        self.next_id += 1;
        let id = OrderId(self.next_id);
        let size = match side {
            OrderSide::Buy => self.order_size(bar.close),
            OrderSide::Sell => self.position,
        };
        debug!(id = %id, side = %side, size, "Order queued");
        self.queued.push_back(QueuedOrder { id, side, size });
        id
    }

    fn process_bar(&mut self, bar: &Bar) -> Vec<Notification> {
        let mut out = Vec::with_capacity(self.queued.len());
        while let Some(order) = self.queued.pop_front() {
            match order.side {
                OrderSide::Buy => {
                    let n = self.fill_buy(order, bar.open);
                    out.push(n);
                }
                OrderSide::Sell => self.fill_sell(order, bar.open, &mut out),
            }
        }
        out
    }

    fn cash(&self) -> f64 {
        self.cash
    }

    fn position_size(&self) -> u64 {
        self.position
    }
}
