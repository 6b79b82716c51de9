//! Crypto pair signal dashboard backend.
//!
//! Moving-average crossover signals over Binance candles, a synthetic demo
//! generator, and a signing proxy for authenticated Binance endpoints.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
