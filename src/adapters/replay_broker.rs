//! Broker that plays back the notifications and account figures recorded by
//! an earlier run. Feeding the same bars through a fresh strategy must then
//! reproduce the recorded decisions exactly.

use crate::domain::backtest::BarRecord;
use crate::domain::ohlcv::Bar;
use crate::domain::order::{Notification, OrderId, OrderSide};
use crate::domain::strategy::AccountSnapshot;
use crate::ports::broker_port::BrokerPort;

#[derive(Debug, Clone)]
pub struct ReplayBroker {
    records: Vec<BarRecord>,
    cursor: usize,
    account: AccountSnapshot,
    next_id: u64,
    submitted: Vec<(OrderSide, Bar)>,
}

impl ReplayBroker {
    pub fn new(records: Vec<BarRecord>, initial_cash: f64) -> Self {
        ReplayBroker {
            records,
            cursor: 0,
            account: AccountSnapshot {
                cash: initial_cash,
                position_size: 0,
            },
            next_id: 0,
            submitted: Vec::new(),
        }
    }

    /// Orders the strategy sent during playback, in order.
    pub fn submitted(&self) -> &[(OrderSide, Bar)] {
        &self.submitted
    }
}

impl BrokerPort for ReplayBroker {
    fn submit(&mut self, side: OrderSide, bar: &Bar) -> OrderId {
        self.next_id += 1;
        self.submitted.push((side, bar.clone()));
        OrderId(self.next_id)
    }

    fn process_bar(&mut self, bar: &Bar) -> Vec<Notification> {
        let Some(record) = self.records.get(self.cursor) else {
            return Vec::new();
        };
        self.cursor += 1;
        if record.timestamp != bar.timestamp {
            return Vec::new();
        }
        self.account = record.account;
        record.notifications.clone()
    }

    fn cash(&self) -> f64 {
        self.account.cash
    }

    fn position_size(&self) -> u64 {
        self.account.position_size
    }
}
