//! Unit tests for the in-memory market data provider

use chrono::Utc;
use cryptosignals::models::candle::Candle;
use cryptosignals::models::market::{Ticker24h, Timeframe};
use cryptosignals::services::market_data::{
    InMemoryMarketDataProvider, MarketDataError, MarketDataProvider,
};

fn create_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let price = 100.0 + i as f64;
            Candle::new(price, price + 1.0, price - 1.0, price, 10.0, Utc::now())
        })
        .collect()
}

fn ticker(symbol: &str, last_price: f64) -> Ticker24h {
    Ticker24h {
        symbol: symbol.to_string(),
        price_change: 1.0,
        price_change_percent: 1.0,
        last_price,
        high_price: last_price,
        low_price: last_price,
        volume: 1.0,
        quote_volume: last_price,
    }
}

#[tokio::test]
async fn test_returns_latest_candles_up_to_limit() {
    let provider = InMemoryMarketDataProvider::new().with_candles("BTCUSDT", create_candles(10));

    let candles = provider.get_candles("BTCUSDT", Timeframe::OneHour, 3).await.unwrap();
    assert_eq!(candles.len(), 3);
    assert_eq!(candles[0].close, 107.0);
    assert_eq!(candles[2].close, 109.0);

    let all = provider.get_candles("BTCUSDT", Timeframe::OneDay, 100).await.unwrap();
    assert_eq!(all.len(), 10);
}

#[tokio::test]
async fn test_unknown_symbol() {
    let provider = InMemoryMarketDataProvider::new();
    assert!(matches!(
        provider.get_candles("NOPE", Timeframe::OneHour, 10).await,
        Err(MarketDataError::UnknownSymbol(symbol)) if symbol == "NOPE"
    ));
    assert!(provider.get_24h_stats("NOPE").await.is_err());
    assert!(provider.get_latest_price("NOPE").await.is_err());
}

#[tokio::test]
async fn test_latest_price_prefers_ticker() {
    let provider = InMemoryMarketDataProvider::new()
        .with_candles("BTCUSDT", create_candles(5))
        .with_candles("ETHUSDT", create_candles(5))
        .with_ticker(ticker("BTCUSDT", 60_000.0));

    assert_eq!(provider.get_latest_price("BTCUSDT").await.unwrap(), 60_000.0);
    assert_eq!(provider.get_latest_price("ETHUSDT").await.unwrap(), 104.0);
    assert_eq!(provider.get_24h_stats("BTCUSDT").await.unwrap().last_price, 60_000.0);
}
