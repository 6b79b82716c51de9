//! Runtime configuration loaded once at startup.
//!
//! Values come from the process environment (optionally seeded from `.env` by
//! the binaries). [`AppConfig::from_lookup`] accepts any key lookup so the
//! parsing and validation rules can be exercised without touching the real
//! environment.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::market::Timeframe;
use crate::signals::board::SignalMode;

pub const DEFAULT_API_BASE: &str = "https://api.binance.com/api/v3";
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;
/// Binance rejects receive windows above one minute.
pub const MAX_RECV_WINDOW_MS: u64 = 60_000;
/// Upper bound of the klines `limit` parameter.
pub const MAX_CANDLE_LIMIT: usize = 1000;

pub const SAMPLE_PAIRS: [&str; 15] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "ADAUSDT", "DOGEUSDT", "XRPUSDT", "DOTUSDT", "SOLUSDT",
    "LTCUSDT", "LINKUSDT", "MATICUSDT", "AVAXUSDT", "UNIUSDT", "ETCUSDT", "BCHUSDT",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("BINANCE_API_KEY and BINANCE_API_SECRET must be set together")]
    IncompleteCredentials,
}

/// Get the deployment environment name (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// `production` and `prod` select production behaviour (JSON logs).
pub fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// API key pair for signed Binance requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST base including the version prefix, e.g. `https://api.binance.com/api/v3`
    pub api_base: String,
    pub recv_window_ms: u64,
    pub credentials: Option<Credentials>,
    /// Serve canned payloads for authenticated endpoints when no credentials exist
    pub mock_fallback: bool,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            credentials: None,
            mock_fallback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub mode: SignalMode,
    pub default_timeframe: Timeframe,
    pub candle_limit: usize,
    pub pair_limit: usize,
    /// Quote assets a live pass scans, e.g. `USDT`, `BTC`
    pub quote_assets: Vec<String>,
    pub sample_pairs: Vec<String>,
    /// Delay per symbol in demo passes; live passes are not paced
    pub request_pacing: Duration,
    /// 1 keeps the per-symbol loop strictly sequential
    pub max_in_flight: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: SignalMode::Live,
            default_timeframe: Timeframe::OneHour,
            candle_limit: 100,
            pair_limit: 20,
            quote_assets: vec!["USDT".to_string(), "BTC".to_string()],
            sample_pairs: SAMPLE_PAIRS.iter().map(|s| s.to_string()).collect(),
            request_pacing: Duration::from_millis(100),
            max_in_flight: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub binance: BinanceConfig,
    pub engine: EngineConfig,
    /// 0 disables the periodic refresh scheduler
    pub refresh_interval_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: 8080,
            binance: BinanceConfig::default(),
            engine: EngineConfig::default(),
            refresh_interval_seconds: 0,
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = AppConfig::default();

        let credentials = match (get("BINANCE_API_KEY"), get("BINANCE_API_SECRET")) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        let recv_window_ms = parse_or(&get, "BINANCE_RECV_WINDOW", defaults.binance.recv_window_ms)?;
        check_range("BINANCE_RECV_WINDOW", recv_window_ms, 1, MAX_RECV_WINDOW_MS)?;

        let binance = BinanceConfig {
            api_base: get("BINANCE_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.binance.api_base),
            recv_window_ms,
            credentials,
            mock_fallback: parse_bool_or(&get, "MOCK_FALLBACK", defaults.binance.mock_fallback)?,
        };

        let candle_limit: usize = parse_or(&get, "CANDLE_LIMIT", defaults.engine.candle_limit)?;
        check_range("CANDLE_LIMIT", candle_limit as u64, 1, MAX_CANDLE_LIMIT as u64)?;

        let pair_limit: usize = parse_or(&get, "PAIR_LIMIT", defaults.engine.pair_limit)?;
        check_range("PAIR_LIMIT", pair_limit as u64, 1, u64::MAX)?;

        let max_in_flight: usize = parse_or(&get, "MAX_IN_FLIGHT", defaults.engine.max_in_flight)?;
        check_range("MAX_IN_FLIGHT", max_in_flight as u64, 1, 64)?;

        let quote_assets = match get("QUOTE_ASSETS") {
            Some(list) => list
                .split(',')
                .map(|q| q.trim().to_uppercase())
                .filter(|q| !q.is_empty())
                .collect(),
            None => defaults.engine.quote_assets,
        };

        let pacing_ms: u64 = parse_or(
            &get,
            "REQUEST_PACING_MS",
            defaults.engine.request_pacing.as_millis() as u64,
        )?;

        let engine = EngineConfig {
            mode: parse_or(&get, "SIGNAL_MODE", defaults.engine.mode)?,
            default_timeframe: parse_or(&get, "SIGNAL_TIMEFRAME", defaults.engine.default_timeframe)?,
            candle_limit,
            pair_limit,
            quote_assets,
            sample_pairs: defaults.engine.sample_pairs,
            request_pacing: Duration::from_millis(pacing_ms),
            max_in_flight,
        };

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or(&get, "PORT", defaults.port)?,
            binance,
            engine,
            refresh_interval_seconds: parse_or(
                &get,
                "REFRESH_INTERVAL_SECONDS",
                defaults.refresh_interval_seconds,
            )?,
        })
    }

    pub fn is_production(&self) -> bool {
        is_production(&self.environment)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
        None => Ok(default),
    }
}

fn check_range(key: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            key,
            value,
            min,
            max,
        });
    }
    Ok(())
}
