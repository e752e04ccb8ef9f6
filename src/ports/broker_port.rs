//! Order execution port trait.
//!
//! The run loop talks to a broker only through this trait: it submits
//! intents, asks for the notifications a new bar produces, and reads the
//! account figures strategies are allowed to see.

use crate::domain::ohlcv::Bar;
use crate::domain::order::{Notification, OrderId, OrderSide};

pub trait BrokerPort {
    /// Queue a market order created on `bar`.
    fn submit(&mut self, side: OrderSide, bar: &Bar) -> OrderId;

    /// Resolve queued orders against `bar`. Every submitted order gets exactly
    /// one terminal notification.
    fn process_bar(&mut self, bar: &Bar) -> Vec<Notification>;

    fn cash(&self) -> f64;

    fn position_size(&self) -> u64;

    /// Cash plus the position marked at `price`.
    fn value(&self, price: f64) -> f64 {
        self.cash() + self.position_size() as f64 * price
    }
}
