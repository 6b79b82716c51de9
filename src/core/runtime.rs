//! Signal runtime: owns the current board and runs refresh passes against it

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::metrics::Metrics;
use crate::models::market::Timeframe;
use crate::signals::board::SignalBoard;
use crate::signals::engine::{EngineError, SignalEngine};

/// Configuration for the refresh runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub refresh_interval_seconds: u64,
    pub default_timeframe: Timeframe,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 60,
            default_timeframe: Timeframe::OneHour,
        }
    }
}

/// Each pass fills a fresh board and swaps it in when done. Passes started
/// while another is running are not serialized; whichever finishes last wins.
pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: Arc<SignalEngine>,
    board: Arc<RwLock<SignalBoard>>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalRuntime {
    pub fn new(config: RuntimeConfig, engine: Arc<SignalEngine>) -> Self {
        let board = SignalBoard::new(engine.mode(), config.default_timeframe);
        Self {
            config,
            engine,
            board: Arc::new(RwLock::new(board)),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<SignalEngine> {
        &self.engine
    }

    /// Snapshot of the current board
    pub async fn current(&self) -> SignalBoard {
        self.board.read().await.clone()
    }

    /// Run one pass and replace the shared board with its result. The
    /// previous board stays in place if the pass fails.
    pub async fn refresh(&self, timeframe: Option<Timeframe>) -> Result<SignalBoard, EngineError> {
        let timeframe = timeframe.unwrap_or(self.config.default_timeframe);
        let mut next = SignalBoard::new(self.engine.mode(), timeframe);

        match self.engine.refresh(&mut next, timeframe).await {
            Ok(()) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_refresh(&next);
                }
                *self.board.write().await = next.clone();
                info!(
                    mode = %next.mode,
                    timeframe = %timeframe,
                    signals = next.len(),
                    "signal board replaced"
                );
                Ok(next)
            }
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_refresh_failure();
                }
                error!(error = %e, "error generating signals");
                Err(e)
            }
        }
    }
}
