//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod market;
pub mod pair;
pub mod signal;

pub use candle::Candle;
pub use indicators::SmaIndicator;
pub use market::{Ticker24h, Timeframe, TradingPair};
pub use pair::{format_pair, split_pair, QUOTE_ASSETS};
pub use signal::{format_price, Signal, SignalSource, SignalType};
