//! Core domain types and logic.

pub mod ohlcv;
pub mod window;
pub mod indicator;
pub mod order;
pub mod tracker;
pub mod events;
pub mod strategy;
pub mod backtest;
pub mod config_validation;
pub mod error;
