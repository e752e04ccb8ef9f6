//! Order intents, fills and broker notifications.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Broker-assigned identifier, monotonically increasing per broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal states other than completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Canceled,
    Margin,
    Rejected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Canceled => write!(f, "Canceled"),
            OrderStatus::Margin => write!(f, "Margin"),
            OrderStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Execution details of a completed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub side: OrderSide,
    pub price: f64,
    pub size: u64,
    /// price * size
    pub value: f64,
    pub commission: f64,
}

impl Fill {
    pub fn new(side: OrderSide, price: f64, size: u64, commission: f64) -> Self {
        Fill {
            side,
            price,
            size,
            value: price * size as f64,
            commission,
        }
    }
}

/// Everything a broker reports back about submitted orders.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Completed { id: OrderId, fill: Fill },
    Failed { id: OrderId, status: OrderStatus },
    /// Emitted after the fill that flattens a position.
    TradeClosed { gross: f64, net: f64 },
}

impl Notification {
    /// True for the single notification that ends an order's life.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notification::TradeClosed { .. })
    }
}
