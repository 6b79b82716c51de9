//! Market data provider interface and an in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::candle::Candle;
use crate::models::market::{Ticker24h, Timeframe, TradingPair};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP error! Status: {status}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("API credentials not configured")]
    MissingCredentials,

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Historical candles for a symbol, oldest first
    async fn get_candles(
        &self,
        symbol: &str,
        interval: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Get the latest price for a symbol
    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError>;

    async fn get_24h_stats(&self, symbol: &str) -> Result<Ticker24h, MarketDataError>;

    /// Every symbol listed on the exchange
    async fn get_trading_pairs(&self) -> Result<Vec<TradingPair>, MarketDataError>;
}

/// Fixture-backed provider. Candles are keyed by symbol only; the requested
/// interval is ignored.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketDataProvider {
    candles: HashMap<String, Vec<Candle>>,
    tickers: HashMap<String, Ticker24h>,
    pairs: Vec<TradingPair>,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candles(mut self, symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        self.candles.insert(symbol.into(), candles);
        self
    }

    pub fn with_ticker(mut self, ticker: Ticker24h) -> Self {
        self.tickers.insert(ticker.symbol.clone(), ticker);
        self
    }

    pub fn with_pair(mut self, pair: TradingPair) -> Self {
        self.pairs.push(pair);
        self
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        _interval: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let candles = self
            .candles
            .get(symbol)
            .ok_or_else(|| MarketDataError::UnknownSymbol(symbol.to_string()))?;
        let start = candles.len().saturating_sub(limit);
        Ok(candles[start..].to_vec())
    }

    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        if let Some(ticker) = self.tickers.get(symbol) {
            return Ok(ticker.last_price);
        }
        self.candles
            .get(symbol)
            .and_then(|candles| candles.last())
            .map(|candle| candle.close)
            .ok_or_else(|| MarketDataError::UnknownSymbol(symbol.to_string()))
    }

    async fn get_24h_stats(&self, symbol: &str) -> Result<Ticker24h, MarketDataError> {
        self.tickers
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::UnknownSymbol(symbol.to_string()))
    }

    async fn get_trading_pairs(&self) -> Result<Vec<TradingPair>, MarketDataError> {
        Ok(self.pairs.clone())
    }
}
