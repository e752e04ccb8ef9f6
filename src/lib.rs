//! sigtrader: long-only trading signal strategies evaluated bar by bar.
//!
//! Hexagonal architecture: indicators, strategies and the run loop in
//! [`domain`], port traits in [`ports`], concrete feeds, brokers and config
//! in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
