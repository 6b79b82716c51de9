//! Binance REST client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::mock::mock_response;
use super::proxy::{ProxyError, SigningProxy};
use super::signing::RequestSigner;
use crate::config::BinanceConfig;
use crate::models::candle::Candle;
use crate::models::market::{Ticker24h, Timeframe, TradingPair};
use crate::services::market_data::{MarketDataError, MarketDataProvider};

/// Payload tagged with whether it came from Binance or from the canned demo data.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Real(T),
    Mocked(T),
}

impl<T> Sourced<T> {
    pub fn is_mocked(&self) -> bool {
        matches!(self, Sourced::Mocked(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Sourced::Real(value) | Sourced::Mocked(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Real(value) | Sourced::Mocked(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceTicker {
    price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTicker24h {
    symbol: String,
    price_change: String,
    price_change_percent: String,
    last_price: String,
    high_price: String,
    low_price: String,
    volume: String,
    quote_volume: String,
}

impl TryFrom<RawTicker24h> for Ticker24h {
    type Error = MarketDataError;

    fn try_from(raw: RawTicker24h) -> Result<Self, Self::Error> {
        Ok(Ticker24h {
            price_change: parse_decimal("priceChange", &raw.price_change)?,
            price_change_percent: parse_decimal("priceChangePercent", &raw.price_change_percent)?,
            last_price: parse_decimal("lastPrice", &raw.last_price)?,
            high_price: parse_decimal("highPrice", &raw.high_price)?,
            low_price: parse_decimal("lowPrice", &raw.low_price)?,
            volume: parse_decimal("volume", &raw.volume)?,
            quote_volume: parse_decimal("quoteVolume", &raw.quote_volume)?,
            symbol: raw.symbol,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<TradingPair>,
}

fn parse_decimal(field: &str, value: &str) -> Result<f64, MarketDataError> {
    value
        .parse()
        .map_err(|_| MarketDataError::InvalidResponse(format!("{} is not a number: '{}'", field, value)))
}

impl From<ProxyError> for MarketDataError {
    fn from(error: ProxyError) -> Self {
        match error {
            ProxyError::MissingCredentials => MarketDataError::MissingCredentials,
            ProxyError::Transport(e) => MarketDataError::Transport(e),
            ProxyError::Upstream { status, details } => MarketDataError::Http {
                status,
                body: details.to_string(),
            },
            other => MarketDataError::InvalidRequest(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    api_base: String,
    proxy: SigningProxy,
    mock_fallback: bool,
}

impl BinanceClient {
    pub fn new(config: &BinanceConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &BinanceConfig, client: reqwest::Client) -> Self {
        let signer = config
            .credentials
            .clone()
            .map(|credentials| RequestSigner::new(credentials, config.recv_window_ms));
        let proxy = SigningProxy::new(client.clone(), config.api_base.clone(), signer);
        Self {
            client,
            api_base: config.api_base.clone(),
            proxy,
            mock_fallback: config.mock_fallback,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn proxy(&self) -> &SigningProxy {
        &self.proxy
    }

    async fn get_public<T, P>(&self, endpoint: &str, params: &P) -> Result<T, MarketDataError>
    where
        T: DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.api_base, endpoint);
        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MarketDataError::InvalidResponse(e.to_string()))
    }

    /// Request an endpoint that may need authentication.
    ///
    /// Ticker and kline endpoints are public and always fetched for real.
    /// Anything else goes through the signing proxy when credentials are
    /// configured, and otherwise falls back to canned data if enabled.
    pub async fn authenticated_request(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Sourced<Value>, MarketDataError> {
        if endpoint.starts_with("/ticker") || endpoint.starts_with("/klines") {
            let body = self.get_public::<Value, _>(endpoint, params).await?;
            return Ok(Sourced::Real(body));
        }

        if self.proxy.is_configured() {
            let response = self.proxy.forward(endpoint, params).await?;
            return Ok(Sourced::Real(response.body));
        }

        if self.mock_fallback {
            info!(endpoint = %endpoint, "no API credentials, serving mock data");
            return Ok(Sourced::Mocked(mock_response(endpoint, params)));
        }

        warn!(endpoint = %endpoint, "API credentials not found");
        Err(MarketDataError::MissingCredentials)
    }

    pub async fn account_info(&self) -> Result<Sourced<Value>, MarketDataError> {
        self.authenticated_request("/account", &[]).await
    }

    pub async fn trade_history(&self, symbol: &str) -> Result<Sourced<Value>, MarketDataError> {
        self.authenticated_request("/myTrades", &[("symbol".to_string(), symbol.to_string())])
            .await
    }
}

#[async_trait]
impl MarketDataProvider for BinanceClient {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let limit = limit.to_string();
        let rows: Vec<Value> = self
            .get_public(
                "/klines",
                &[
                    ("symbol", symbol),
                    ("interval", interval.as_str()),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        let total = rows.len();
        let candles: Vec<Candle> = rows.iter().filter_map(Candle::from_kline_row).collect();
        if candles.len() < total {
            warn!(
                symbol = %symbol,
                dropped = total - candles.len(),
                "dropped malformed kline rows"
            );
        }
        debug!(symbol = %symbol, count = candles.len(), "fetched candles");
        Ok(candles)
    }

    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let ticker: PriceTicker = self
            .get_public("/ticker/price", &[("symbol", symbol)])
            .await?;
        parse_decimal("price", &ticker.price)
    }

    async fn get_24h_stats(&self, symbol: &str) -> Result<Ticker24h, MarketDataError> {
        let raw: RawTicker24h = self.get_public("/ticker/24hr", &[("symbol", symbol)]).await?;
        raw.try_into()
    }

    async fn get_trading_pairs(&self) -> Result<Vec<TradingPair>, MarketDataError> {
        let info: ExchangeInfo = self.get_public("/exchangeInfo", &[] as &[(&str, &str)]).await?;
        debug!(count = info.symbols.len(), "fetched trading pairs");
        Ok(info.symbols)
    }
}
