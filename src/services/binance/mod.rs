//! Binance spot REST API: public market data, request signing and the
//! authenticated request proxy.

pub mod client;
pub mod mock;
pub mod proxy;
pub mod signing;

pub use client::{BinanceClient, Sourced};
pub use proxy::{ProxyError, ProxyRequest, ProxyResponse, SigningProxy};
pub use signing::{RequestSigner, API_KEY_HEADER};
