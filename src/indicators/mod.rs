//! Technical indicators computed from candle series.

pub mod trend;

pub use trend::*;
