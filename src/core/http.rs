//! HTTP endpoint server using Axum

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::{AppConfig, MAX_CANDLE_LIMIT};
use crate::core::runtime::{RuntimeConfig, SignalRuntime};
use crate::core::scheduler::RefreshScheduler;
use crate::metrics::Metrics;
use crate::models::candle::Candle;
use crate::models::market::{Ticker24h, Timeframe, TradingPair};
use crate::models::pair::format_pair;
use crate::services::binance::{BinanceClient, ProxyError, ProxyRequest, SigningProxy};
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use crate::signals::board::SignalBoard;
use crate::signals::engine::SignalEngine;
use crate::signals::filter::SignalFilter;

const SERVICE_NAME: &str = "cryptosignals";
const REFRESH_ERROR_MESSAGE: &str = "Error generating signals. Please try again.";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub runtime: Arc<SignalRuntime>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub proxy: SigningProxy,
}

impl AppState {
    /// Wire the Binance client, engine and runtime from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, prometheus::Error> {
        let metrics = Arc::new(Metrics::new()?);
        let client = BinanceClient::new(&config.binance);
        let proxy = client.proxy().clone();
        let market_data: Arc<dyn MarketDataProvider> = Arc::new(client);

        let engine = Arc::new(SignalEngine::new(market_data.clone(), config.engine.clone()));
        let runtime = SignalRuntime::new(
            RuntimeConfig {
                refresh_interval_seconds: config.refresh_interval_seconds,
                default_timeframe: config.engine.default_timeframe,
            },
            engine,
        )
        .with_metrics(metrics.clone());

        Ok(Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            runtime: Arc::new(runtime),
            market_data,
            proxy,
        })
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn market_data_error(e: MarketDataError) -> ApiError {
    let status = match e {
        MarketDataError::UnknownSymbol(_) => StatusCode::NOT_FOUND,
        MarketDataError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    let details = match &e {
        MarketDataError::Http { body, .. } => body.clone(),
        _ => "Unknown error".to_string(),
    };
    (
        status,
        Json(json!({ "error": e.to_string(), "details": details })),
    )
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Current board, filtered by `asset` (quote suffix or `all`) and `type`
async fn list_signals(
    State(state): State<AppState>,
    Query(filter): Query<SignalFilter>,
) -> Json<SignalBoard> {
    Json(state.runtime.current().await.filtered(&filter))
}

#[derive(Debug, Deserialize)]
struct RefreshQuery {
    timeframe: Option<Timeframe>,
}

/// Run a refresh pass and return the new board
async fn refresh_signals(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<SignalBoard>, ApiError> {
    state
        .runtime
        .refresh(query.timeframe)
        .await
        .map(Json)
        .map_err(|e| {
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": REFRESH_ERROR_MESSAGE, "details": e.to_string() })),
            )
        })
}

async fn list_pairs(State(state): State<AppState>) -> Result<Json<Vec<TradingPair>>, ApiError> {
    state
        .market_data
        .get_trading_pairs()
        .await
        .map(Json)
        .map_err(market_data_error)
}

#[derive(Debug, Serialize)]
struct FormattedPair {
    symbol: String,
    pair: String,
}

async fn format_pair_handler(Path(symbol): Path<String>) -> Json<FormattedPair> {
    let pair = format_pair(&symbol);
    Json(FormattedPair { symbol, pair })
}

async fn get_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let price = state
        .market_data
        .get_latest_price(&symbol)
        .await
        .map_err(market_data_error)?;
    Ok(Json(json!({ "symbol": symbol, "price": price })))
}

async fn get_ticker(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Ticker24h>, ApiError> {
    state
        .market_data
        .get_24h_stats(&symbol)
        .await
        .map(Json)
        .map_err(market_data_error)
}

#[derive(Debug, Deserialize)]
struct CandleQuery {
    interval: Option<Timeframe>,
    limit: Option<usize>,
}

async fn get_candles(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<CandleQuery>,
) -> Result<Json<Vec<Candle>>, ApiError> {
    let interval = query
        .interval
        .unwrap_or(state.runtime.config().default_timeframe);
    let limit = query.limit.unwrap_or(100).clamp(1, MAX_CANDLE_LIMIT);
    state
        .market_data
        .get_candles(&symbol, interval, limit)
        .await
        .map(Json)
        .map_err(market_data_error)
}

/// Signing proxy. An empty body is treated as `{}`.
async fn proxy_request(State(state): State<AppState>, body: Bytes) -> Response {
    let raw: &[u8] = if body.is_empty() { b"{}" } else { &body };
    let result = match serde_json::from_slice::<ProxyRequest>(raw) {
        Ok(request) => state.proxy.handle(&request).await,
        Err(e) => Err(ProxyError::InvalidBody(e.to_string())),
    };

    let (status, body) = match result {
        Ok(response) => (response.status, response.body),
        Err(e) => {
            warn!(error = %e, "proxy request failed");
            (e.status_code(), e.body())
        }
    };
    state
        .metrics
        .proxy_requests_total
        .with_label_values(&[&status.to_string()])
        .inc();

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(body)).into_response()
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(list_signals))
        .route("/api/signals/refresh", post(refresh_signals))
        .route("/api/pairs", get(list_pairs))
        .route("/api/pairs/{symbol}/format", get(format_pair_handler))
        .route("/api/price/{symbol}", get(get_price))
        .route("/api/ticker/{symbol}", get(get_ticker))
        .route("/api/candles/{symbol}", get(get_candles))
        .route("/api/proxy", post(proxy_request))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_config(&config)?;

    if !state.proxy.is_configured() {
        warn!("BINANCE_API_KEY/BINANCE_API_SECRET not set - /api/proxy will reject requests");
    }

    // Populate the board once at startup, like the dashboard's first load.
    let runtime = state.runtime.clone();
    tokio::spawn(async move {
        let _ = runtime.refresh(None).await;
    });

    let scheduler = if config.refresh_interval_seconds > 0 {
        let scheduler =
            RefreshScheduler::new(state.runtime.clone(), config.refresh_interval_seconds)?;
        scheduler.start().await;
        Some(scheduler)
    } else {
        info!("Periodic refresh disabled (REFRESH_INTERVAL_SECONDS=0)");
        None
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }
    Ok(())
}
