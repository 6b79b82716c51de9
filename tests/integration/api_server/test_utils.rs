//! Test utilities for API server integration tests

use axum_test::TestServer;
use chrono::DateTime;
use cryptosignals::config::EngineConfig;
use cryptosignals::core::http::{create_router, AppState, HealthStatus};
use cryptosignals::core::runtime::{RuntimeConfig, SignalRuntime};
use cryptosignals::metrics::Metrics;
use cryptosignals::models::candle::Candle;
use cryptosignals::models::market::{Ticker24h, TradingPair};
use cryptosignals::services::binance::SigningProxy;
use cryptosignals::services::market_data::{
    InMemoryMarketDataProvider, MarketDataError, MarketDataProvider,
};
use cryptosignals::signals::{SignalEngine, SignalMode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub runtime: Arc<SignalRuntime>,
}

impl TestApiServer {
    /// Live mode over fixture candles, proxy without credentials.
    pub async fn new() -> Self {
        Self::with_parts(
            Arc::new(fixture_provider()),
            SignalMode::Live,
            SigningProxy::new(reqwest::Client::new(), "http://127.0.0.1:9", None),
        )
    }

    pub async fn with_proxy(proxy: SigningProxy) -> Self {
        Self::with_parts(Arc::new(fixture_provider()), SignalMode::Live, proxy)
    }

    pub fn with_parts(
        market_data: Arc<dyn MarketDataProvider>,
        mode: SignalMode,
        proxy: SigningProxy,
    ) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let engine_config = EngineConfig {
            mode,
            request_pacing: Duration::ZERO,
            ..EngineConfig::default()
        };
        let engine = Arc::new(SignalEngine::new(market_data.clone(), engine_config));
        let runtime = Arc::new(
            SignalRuntime::new(RuntimeConfig::default(), engine).with_metrics(metrics.clone()),
        );

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            runtime: runtime.clone(),
            market_data,
            proxy,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            runtime,
        }
    }
}

pub fn create_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open_time = DateTime::from_timestamp_millis(i as i64 * 3_600_000).unwrap();
            Candle::new(close, close, close, close, 1000.0, open_time)
        })
        .collect()
}

/// Flat at 100 for 50 bars, then a final close of `last`.
pub fn flat_then(last: f64) -> Vec<Candle> {
    let mut closes = vec![100.0; 50];
    closes.push(last);
    create_candles(&closes)
}

fn pair(symbol: &str, base: &str, quote: &str) -> TradingPair {
    TradingPair {
        symbol: symbol.to_string(),
        base_asset: base.to_string(),
        quote_asset: quote.to_string(),
    }
}

/// BTCUSDT crosses up, ETHBTC crosses down, SOLUSDT stays flat.
pub fn fixture_provider() -> InMemoryMarketDataProvider {
    InMemoryMarketDataProvider::new()
        .with_pair(pair("BTCUSDT", "BTC", "USDT"))
        .with_pair(pair("ETHBTC", "ETH", "BTC"))
        .with_pair(pair("SOLUSDT", "SOL", "USDT"))
        .with_candles("BTCUSDT", flat_then(200.0))
        .with_candles("ETHBTC", flat_then(50.0))
        .with_candles("SOLUSDT", flat_then(100.0))
        .with_ticker(Ticker24h {
            symbol: "BTCUSDT".to_string(),
            price_change: 1200.0,
            price_change_percent: 2.0,
            last_price: 61_200.0,
            high_price: 61_500.0,
            low_price: 59_800.0,
            volume: 1_234.5,
            quote_volume: 75_000_000.0,
        })
}

/// Provider whose every call fails, as if Binance were unreachable.
pub struct UnavailableProvider;

#[async_trait::async_trait]
impl MarketDataProvider for UnavailableProvider {
    async fn get_candles(
        &self,
        _symbol: &str,
        _interval: cryptosignals::models::market::Timeframe,
        _limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Err(unavailable())
    }

    async fn get_latest_price(&self, _symbol: &str) -> Result<f64, MarketDataError> {
        Err(unavailable())
    }

    async fn get_24h_stats(&self, _symbol: &str) -> Result<Ticker24h, MarketDataError> {
        Err(unavailable())
    }

    async fn get_trading_pairs(&self) -> Result<Vec<TradingPair>, MarketDataError> {
        Err(unavailable())
    }
}

fn unavailable() -> MarketDataError {
    MarketDataError::Http {
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}
