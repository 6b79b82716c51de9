//! Prometheus metrics for the HTTP layer and refresh passes

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::signals::board::SignalBoard;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub signal_refresh_total: IntCounterVec,
    pub signals_generated_total: IntCounterVec,
    pub candle_fetch_failures_total: IntCounter,
    pub proxy_requests_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let signal_refresh_total = IntCounterVec::new(
            Opts::new("signal_refresh_total", "Signal refresh passes by outcome"),
            &["outcome"],
        )?;
        let signals_generated_total = IntCounterVec::new(
            Opts::new("signals_generated_total", "Signals emitted by refresh passes"),
            &["type", "source"],
        )?;
        let candle_fetch_failures_total = IntCounter::new(
            "candle_fetch_failures_total",
            "Symbols skipped because their candle fetch failed",
        )?;
        let proxy_requests_total = IntCounterVec::new(
            Opts::new("proxy_requests_total", "Signing proxy requests by response status"),
            &["status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(signal_refresh_total.clone()))?;
        registry.register(Box::new(signals_generated_total.clone()))?;
        registry.register(Box::new(candle_fetch_failures_total.clone()))?;
        registry.register(Box::new(proxy_requests_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            signal_refresh_total,
            signals_generated_total,
            candle_fetch_failures_total,
            proxy_requests_total,
        })
    }

    /// Record a completed refresh pass.
    pub fn record_refresh(&self, board: &SignalBoard) {
        self.signal_refresh_total.with_label_values(&["ok"]).inc();
        self.candle_fetch_failures_total
            .inc_by(board.failed.len() as u64);
        for signal in board.signals() {
            self.signals_generated_total
                .with_label_values(&[signal.signal_type.as_str(), signal.source.as_str()])
                .inc();
        }
    }

    pub fn record_refresh_failure(&self) {
        self.signal_refresh_total.with_label_values(&["error"]).inc();
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
